//! End-of-run route cost report.

use std::fmt;

use ms_core::{MoteId, Tick};

/// Total cost charged to one user mote.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoteCost {
    pub mote:       MoteId,
    pub eui:        u64,
    pub total_cost: f64,
}

/// Per-user-mote route costs, in ascending `MoteId` order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub finished_at: Tick,
    pub motes:       Vec<MoteCost>,
}

impl RunReport {
    pub fn get(&self, mote: MoteId) -> Option<&MoteCost> {
        self.motes.iter().find(|m| m.mote == mote)
    }

    pub fn total_cost(&self) -> f64 {
        self.motes.iter().map(|m| m.total_cost).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route costs at {}", self.finished_at)?;
        for m in &self.motes {
            writeln!(f, "  EUI {:>16x}: {:.3}", m.eui, m.total_cost)?;
        }
        Ok(())
    }
}
