//! The progression engine: advances every eligible mote by at most one
//! waypoint per tick.

use ms_core::{GeoPoint, MoteId, SimClock, Tick};
use ms_fleet::{Environment, Mote};
use ms_route::{CostCharge, CostModel, RouteEvaluator};
use tracing::{debug, warn};

use crate::{MobilityError, MobilityResult, Phase, ProgressState, ProgressStore, RoutingApplication};

// ── Decisions ─────────────────────────────────────────────────────────────────

/// What one eligible mote does this tick.  Computed without mutating
/// anything, so a failed cost quote leaves the mote untouched.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    /// Move onto `target`, which becomes waypoint `index`.
    Move { index: usize, target: GeoPoint, charge: CostCharge },
    /// Sensor motes only: count the current waypoint as reached.
    Reach { index: usize },
    /// The path ran out; stay put.
    Stall { retries: u32 },
    /// Append `hop` to the path as waypoint `index` and move there.
    Recover { hop: GeoPoint, index: usize, charge: CostCharge },
}

/// One mote that passed the eligibility scan.
struct Candidate {
    mote: MoteId,
    /// `false` when the mote only has its inbox drained this tick.
    eligible: bool,
}

// ── ProgressionEngine ─────────────────────────────────────────────────────────

/// Drives mote progression for one run.
///
/// Each [`step_motes`](Self::step_motes) call has two phases:
///
/// 1. **Scan** (read-only, parallel with the `parallel` feature): which
///    enabled, not-yet-arrived motes are due to move this tick.
/// 2. **Apply** (sequential, ascending `MoteId`): per mote, decide the
///    action, quote its cost, then commit it to the environment, the
///    progression store, and the cost ledger.
///
/// # Type parameter
///
/// `A` supplies corrective hops for exhausted paths; use
/// [`GraphRoutingApplication`][crate::GraphRoutingApplication] to route over
/// the environment's own graph.
pub struct ProgressionEngine<A: RoutingApplication> {
    pub routing: A,

    /// Per-mote progression state.  Seeded by [`setup`](Self::setup).
    pub store: ProgressStore,
}

impl<A: RoutingApplication> ProgressionEngine<A> {
    pub fn new(routing: A) -> Self {
        Self { routing, store: ProgressStore::new() }
    }

    /// Seed one fresh progression state per mote at the current tick.
    pub fn setup(&mut self, env: &Environment) {
        self.store.reset(env.motes().len(), env.now());
    }

    pub fn state(&self, mote: MoteId) -> MobilityResult<&ProgressState> {
        self.store.get(mote)
    }

    /// Advance every eligible mote at the environment's current tick.
    ///
    /// Returns the number of motes that moved.  Stops at the first mote
    /// whose step fails; motes earlier in `MoteId` order keep their moves
    /// and the failing mote is left as it was.
    pub fn step_motes<C: CostModel>(
        &mut self,
        env:       &mut Environment,
        evaluator: &mut RouteEvaluator<C>,
    ) -> MobilityResult<usize> {
        let now        = env.now();
        let candidates = self.scan(env)?;
        let mut moved  = 0;

        for Candidate { mote, eligible } in candidates {
            env.mote_mut(mote)?.consume_packets();
            if !eligible {
                continue;
            }
            let action = self.decide(env, evaluator, mote)?;
            if self.apply(env, evaluator, mote, action, now)? {
                moved += 1;
            }
        }
        Ok(moved)
    }

    // ── Scan ──────────────────────────────────────────────────────────────

    /// Enabled, not-yet-arrived motes in ascending `MoteId` order, each
    /// flagged with whether it may move this tick.
    fn scan(&self, env: &Environment) -> MobilityResult<Vec<Candidate>> {
        let store = &self.store;
        let time  = env.clock().time();
        let check = |(i, mote): (usize, &Mote)| -> Option<MobilityResult<Candidate>> {
            let id = MoteId(i as u32);
            if !mote.enabled || mote.is_arrived(&env.projection) {
                return None;
            }
            Some(store.get(id).map(|state| Candidate {
                mote:     id,
                eligible: is_due(mote, state, time),
            }))
        };

        #[cfg(not(feature = "parallel"))]
        {
            env.motes().iter().enumerate().filter_map(check).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            env.motes().par_iter().enumerate().filter_map(check).collect()
        }
    }

    // ── Decide ────────────────────────────────────────────────────────────

    fn decide<C: CostModel>(
        &self,
        env:       &Environment,
        evaluator: &RouteEvaluator<C>,
        id:        MoteId,
    ) -> MobilityResult<Action> {
        let mote  = env.mote(id)?;
        let state = self.store.get(id)?;
        let path  = mote.path();
        let here  = mote.position();
        let i     = state.waypoint_index;
        let on    = |k: usize| env.to_map(path[k]) == here;

        if !on(i) {
            let charge = if mote.is_user() {
                evaluator.quote(&env.graph, id, path, i)?
            } else {
                CostCharge::none(id)
            };
            return Ok(Action::Move { index: i, target: path[i], charge });
        }

        if !mote.is_user() {
            return Ok(Action::Reach { index: i + 1 });
        }

        // Skip waypoints that coincide with the current position.
        if let Some(k) = (i + 1..path.len()).find(|&k| !on(k)) {
            let charge = evaluator.quote(&env.graph, id, path, k)?;
            return Ok(Action::Move { index: k, target: path[k], charge });
        }

        let retries = state.phase.retries() + 1;
        if retries <= 1 {
            return Ok(Action::Stall { retries });
        }

        let hop = self.next_hop(env, id)?;
        let mut extended = path.to_vec();
        extended.push(hop);
        let index  = extended.len() - 1;
        let charge = evaluator.quote(&env.graph, id, &extended, index)?;
        Ok(Action::Recover { hop, index, charge })
    }

    /// Index 1 of a fresh route from the routing application.
    fn next_hop(&self, env: &Environment, id: MoteId) -> MobilityResult<GeoPoint> {
        let route = self.routing.route(env, id).inspect_err(|e| {
            warn!(mote = %id, error = %e, "corrective route failed");
        })?;
        match route.get(1) {
            Some(&hop) => Ok(hop),
            None => {
                warn!(mote = %id, len = route.len(), "corrective route has no next hop");
                Err(MobilityError::NoRecoveryHop(id))
            }
        }
    }

    // ── Apply ─────────────────────────────────────────────────────────────

    /// Commit `action`.  Returns `true` if the mote changed position.
    fn apply<C: CostModel>(
        &mut self,
        env:       &mut Environment,
        evaluator: &mut RouteEvaluator<C>,
        id:        MoteId,
        action:    Action,
        now:       Tick,
    ) -> MobilityResult<bool> {
        let state = self.store.get_mut(id)?;
        let moved = match action {
            Action::Move { index, target, charge } => {
                env.move_mote(id, target)?;
                evaluator.apply(charge);
                state.waypoint_index = index;
                state.phase = Phase::Advancing;
                true
            }
            Action::Reach { index } => {
                state.waypoint_index = index;
                false
            }
            Action::Stall { retries } => {
                state.phase = Phase::Stalled { retries };
                debug!(%now, mote = %id, retries, "path exhausted, stalling");
                false
            }
            Action::Recover { hop, index, charge } => {
                env.mote_mut(id)?.push_waypoint(hop);
                env.move_mote(id, hop)?;
                evaluator.apply(charge);
                state.waypoint_index = index;
                state.phase = Phase::Advancing;
                debug!(%now, mote = %id, %hop, cost = charge.cost, "appended corrective hop");
                true
            }
        };
        state.last_move = now;
        Ok(moved)
    }
}

/// Path, speed and start-offset gates.  A path of fewer than two waypoints
/// never progresses, so it can neither stall nor be extended.
fn is_due(mote: &Mote, state: &ProgressState, time: &SimClock) -> bool {
    mote.path().len() > 1
        && state.waypoint_index < mote.path().len()
        && time.ms_since(state.last_move) as f64 >= mote.step_interval_ms()
        && time.elapsed_ms() as f64 > mote.movement_offset_ms()
}
