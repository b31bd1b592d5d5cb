//! Per-mote progression state.

use ms_core::Tick;

/// Where a mote is in the stall/recover cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Advancing,
    /// The path ran out on `retries` consecutive eligible ticks.
    Stalled { retries: u32 },
}

impl Phase {
    #[inline]
    pub fn retries(self) -> u32 {
        match self {
            Phase::Advancing           => 0,
            Phase::Stalled { retries } => retries,
        }
    }
}

/// Progression record for one mote.
///
/// Invariant: `0 <= waypoint_index <= path.len()` of the owning mote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    /// Index of the waypoint the mote is on or heading to.
    pub waypoint_index: usize,

    /// Tick of the most recent eligible step.
    pub last_move: Tick,

    pub phase: Phase,
}

impl ProgressState {
    /// Fresh state at the start of a run.
    #[inline]
    pub fn start(now: Tick) -> Self {
        Self {
            waypoint_index: 0,
            last_move:      now,
            phase:          Phase::Advancing,
        }
    }
}
