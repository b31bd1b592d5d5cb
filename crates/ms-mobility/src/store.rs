//! The `ProgressStore` — per-mote progression records.

use ms_core::{MoteId, Tick};

use crate::{MobilityError, MobilityResult, ProgressState};

/// Progression state for every mote, indexed by `MoteId`.
///
/// Empty until [`reset`](Self::reset) is called at run setup; lookups before
/// that fail with [`MobilityError::MissingState`].
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    states: Vec<ProgressState>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `mote_count` fresh states at `now`, discarding the previous run.
    pub fn reset(&mut self, mote_count: usize, now: Tick) {
        self.states.clear();
        self.states.resize(mote_count, ProgressState::start(now));
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn get(&self, mote: MoteId) -> MobilityResult<&ProgressState> {
        self.states.get(mote.index()).ok_or(MobilityError::MissingState(mote))
    }

    pub fn get_mut(&mut self, mote: MoteId) -> MobilityResult<&mut ProgressState> {
        self.states.get_mut(mote.index()).ok_or(MobilityError::MissingState(mote))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
