//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to simulated milliseconds is held in `SimClock`:
//!
//!   elapsed_ms = tick * tick_duration_ms
//!
//! Using an integer tick as the canonical time unit means all gating
//! arithmetic is exact and comparisons are O(1).  The default tick duration
//! is one millisecond, so a mote moving at 1000 waypoints per second advances
//! on every tick.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated milliseconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data; the
/// trigger queue lives in [`Clock`][crate::Clock].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated milliseconds one tick represents.  Default: 1.
    pub tick_duration_ms: u32,
    /// The current tick — advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0 with the given resolution.
    pub fn new(tick_duration_ms: u32) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Rewind to tick 0 (history reset between runs).
    #[inline]
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_ms as u64
    }

    /// Simulated milliseconds between `earlier` and the current tick.
    #[inline]
    pub fn ms_since(&self, earlier: Tick) -> u64 {
        self.current_tick.since(earlier) * self.tick_duration_ms as u64
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// How many ticks span `ms` milliseconds? (rounds up)
    #[inline]
    pub fn ticks_for_ms(&self, ms: u64) -> u64 {
        ms.div_ceil(self.tick_duration_ms.max(1) as u64)
    }

    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        self.ticks_for_ms(secs * 1_000)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed_ms();
        write!(f, "{} ({}.{:03} s)", self.current_tick, ms / 1_000, ms % 1_000)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Engine-level configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate (enable
/// the `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seed for the run-level RNG (mote activation draws).
    pub seed: u64,

    /// Simulated milliseconds per tick.  Default: 1.
    pub tick_duration_ms: u32,

    /// While information gathering is active, a snapshot of every
    /// connection's accumulated cost is taken once per this many ticks.
    /// Default: 4000.
    pub snapshot_interval_ticks: u64,

    /// Number of snapshot intervals information gathering runs for before
    /// the run counts as finished.  Default: 4000.
    pub budget_intervals: u64,
}

impl SimConfig {
    /// Total ticks an information-gathering run lasts.
    #[inline]
    pub fn gathering_budget_ticks(&self) -> u64 {
        self.snapshot_interval_ticks.saturating_mul(self.budget_intervals)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_ms)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> crate::CoreResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(crate::CoreError::Config("tick_duration_ms must be > 0".into()));
        }
        if self.snapshot_interval_ticks == 0 {
            return Err(crate::CoreError::Config("snapshot_interval_ticks must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                    0,
            tick_duration_ms:        1,
            snapshot_interval_ticks: 4_000,
            budget_intervals:        4_000,
        }
    }
}
