//! Per-run input profile.

use std::collections::BTreeMap;

use crate::{SimError, SimResult};

/// Which motes take part in a run, and for how long a timed run lasts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputProfile {
    pub name: String,

    /// Activation probability by mote index.  Motes not listed are always
    /// activated.  Activation only ever enables a mote.
    pub activation_probabilities: BTreeMap<usize, f64>,

    /// Length of a timed run in simulated seconds.
    pub simulation_duration_secs: u64,
}

impl InputProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_probability(mut self, mote_index: usize, p: f64) -> Self {
        self.activation_probabilities.insert(mote_index, p);
        self
    }

    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.simulation_duration_secs = secs;
        self
    }

    /// Probability that mote `index` is activated for a run.
    pub fn activation_probability(&self, index: usize) -> f64 {
        self.activation_probabilities.get(&index).copied().unwrap_or(1.0)
    }

    pub fn validate(&self) -> SimResult<()> {
        for (&index, &p) in &self.activation_probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Config(format!(
                    "activation probability {p} for mote {index} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}
