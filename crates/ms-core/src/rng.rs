//! Deterministic run-level RNG wrapper.
//!
//! Every random draw in the engine (today: the per-run mote activation
//! lottery) goes through one `SimRng` seeded from `SimConfig::seed`, so the
//! same seed and the same fleet always produce the same run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
///
/// Draws happen during run setup only, never inside the (optionally
/// parallel) eligibility scan.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
