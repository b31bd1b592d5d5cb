//! The `Simulation` runner: run setup, the tick operation, and completion.

use std::fmt;

use ms_core::{SimConfig, SimRng, Tick};
use ms_fleet::Environment;
use ms_mobility::{ProgressionEngine, RoutingApplication};
use ms_route::{CostModel, InformationTable, LengthCost, RouteEvaluator};
use tracing::{debug, info};

use crate::{
    AdaptationManager, FeedbackLoop, InputProfile, MoteCost, RunReport, SimError, SimObserver,
    SimResult,
};

// ── RunCondition ──────────────────────────────────────────────────────────────

/// When a run keeps going.
pub enum RunCondition {
    /// Until every enabled mote has reached its destination.
    UntilAllArrived,
    /// While the clock is before the given tick.
    UntilTick(Tick),
    /// While the predicate holds.
    Custom(Box<dyn Fn(&Environment) -> bool>),
}

impl RunCondition {
    pub fn should_continue(&self, env: &Environment) -> bool {
        match self {
            RunCondition::UntilAllArrived => !env.all_motes_arrived(),
            RunCondition::UntilTick(end)  => env.now() < *end,
            RunCondition::Custom(pred)    => pred(env),
        }
    }
}

impl fmt::Debug for RunCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunCondition::UntilAllArrived => f.write_str("UntilAllArrived"),
            RunCondition::UntilTick(t)    => write!(f, "UntilTick({t})"),
            RunCondition::Custom(_)       => f.write_str("Custom"),
        }
    }
}

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Motes that changed position.
    pub moved: usize,
    /// Clock triggers (transmissions) that fired.
    pub fired: usize,
    /// Whether an information snapshot was taken.
    pub snapshot: bool,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// Drives a fleet through one run at a time.
///
/// The [`Environment`] is not owned; it is borrowed by every call, so the
/// same world can be inspected, edited, and re-run between runs.
///
/// A run must be prepared with [`setup_single_run`](Self::setup_single_run),
/// [`setup_timed_run`](Self::setup_timed_run) or
/// [`setup_run`](Self::setup_run) before [`step`](Self::step) is called.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<A: RoutingApplication, C: CostModel = LengthCost> {
    pub config: SimConfig,

    /// Mote activation probabilities and timed-run duration.
    pub profile: InputProfile,

    /// Per-mote progression state and the corrective-hop source.
    pub engine: ProgressionEngine<A>,

    /// Connection cost ledger.  Reset at every run setup.
    pub evaluator: RouteEvaluator<C>,

    /// The external feedback loop, if any.
    pub adaptation: AdaptationManager,

    information:     InformationTable,
    condition:       Option<RunCondition>,
    rng:             SimRng,
    gathering_ticks: u64,
    reported:        bool,
}

impl<A: RoutingApplication, C: CostModel> Simulation<A, C> {
    pub(crate) fn new(
        config:  SimConfig,
        profile: InputProfile,
        routing: A,
        cost:    C,
    ) -> Self {
        Self {
            rng:             SimRng::new(config.seed),
            config,
            profile,
            engine:          ProgressionEngine::new(routing),
            evaluator:       RouteEvaluator::new(cost),
            adaptation:      AdaptationManager::new(),
            information:     InformationTable::new(),
            condition:       None,
            gathering_ticks: 0,
            reported:        false,
        }
    }

    /// Install `feedback` as the active loop, stopping the previous one.
    pub fn set_adaptation(&mut self, feedback: Box<dyn FeedbackLoop>) {
        self.adaptation.set(feedback);
    }

    // ── Run setup ─────────────────────────────────────────────────────────

    /// Prepare a run that lasts until every enabled mote has arrived.
    ///
    /// With `reset_history` the clock goes back to tick 0 and gateway and
    /// mote packet history is cleared first.
    pub fn setup_single_run(&mut self, env: &mut Environment, reset_history: bool) -> SimResult<()> {
        self.setup_run(env, RunCondition::UntilAllArrived, reset_history)
    }

    /// Prepare a run lasting `profile.simulation_duration_secs` from tick 0.
    pub fn setup_timed_run(&mut self, env: &mut Environment) -> SimResult<()> {
        env.reset_history();
        let ticks = env.clock().time().ticks_for_secs(self.profile.simulation_duration_secs);
        let end   = env.now() + ticks;
        self.setup_run(env, RunCondition::UntilTick(end), false)
    }

    /// Prepare a run that continues while `condition` holds.
    pub fn setup_run(
        &mut self,
        env:           &mut Environment,
        condition:     RunCondition,
        reset_history: bool,
    ) -> SimResult<()> {
        self.profile.validate()?;
        if reset_history {
            env.reset_history();
        }

        self.reported        = false;
        self.gathering_ticks = 0;
        self.information.clear();
        self.evaluator.reset();

        self.activate_motes(env);
        for gw in env.gateways_mut() {
            gw.reset();
        }
        env.reset_motes();
        self.engine.setup(env);
        env.clock_mut().clear_triggers();
        env.schedule_transmissions();

        let enabled = env.motes().iter().filter(|m| m.enabled).count();
        info!(
            tick = %env.now(),
            motes = env.motes().len(),
            enabled,
            condition = ?condition,
            "run set up"
        );
        self.condition = Some(condition);
        Ok(())
    }

    /// Draw each mote's activation from the profile.  Motes are only ever
    /// enabled here, never disabled.
    fn activate_motes(&mut self, env: &mut Environment) {
        for (i, mote) in env.motes_mut().iter_mut().enumerate() {
            if self.rng.gen_bool(self.profile.activation_probability(i)) {
                mote.enabled = true;
            }
        }
    }

    // ── Tick operation ────────────────────────────────────────────────────

    /// Advance the run by one tick.
    pub fn step(&mut self, env: &mut Environment) -> SimResult<StepOutcome> {
        if self.condition.is_none() {
            return Err(SimError::NotSetUp);
        }

        let moved = self.engine.step_motes(env, &mut self.evaluator)?;

        let mut snapshot = false;
        if self.adaptation.is_gathering() {
            if self.gathering_ticks % self.config.snapshot_interval_ticks == 0 {
                self.evaluator.update_information(&mut self.information, &env.graph);
                snapshot = true;
                debug!(
                    tick = %env.now(),
                    gathering_ticks = self.gathering_ticks,
                    connections = self.information.len(),
                    "information snapshot"
                );
            }
            self.gathering_ticks += 1;
        }

        let fired = env.advance(1);
        Ok(StepOutcome { moved, fired, snapshot })
    }

    // ── Completion ────────────────────────────────────────────────────────

    /// `true` once the run condition fails, or once information gathering
    /// has used up its budget of `snapshot_interval_ticks * budget_intervals`
    /// ticks.
    pub fn is_finished(&self, env: &Environment) -> SimResult<bool> {
        let condition = self.condition.as_ref().ok_or(SimError::NotSetUp)?;
        let budget_spent = self.adaptation.is_gathering()
            && self.gathering_ticks >= self.config.gathering_budget_ticks();
        Ok(budget_spent || !condition.should_continue(env))
    }

    /// Route cost of every user mote, in ascending `MoteId` order.
    pub fn report(&self, env: &Environment) -> RunReport {
        let motes = env
            .mote_ids()
            .zip(env.motes())
            .filter(|(_, m)| m.is_user())
            .map(|(id, m)| MoteCost {
                mote:       id,
                eui:        m.eui,
                total_cost: self.evaluator.total_cost_path(id),
            })
            .collect();
        RunReport { finished_at: env.now(), motes }
    }

    /// Per-connection cost snapshots taken during this run.
    pub fn information(&self) -> &InformationTable {
        &self.information
    }

    /// Ticks counted while information gathering was active.
    pub fn gathering_ticks(&self) -> u64 {
        self.gathering_ticks
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Step until the run is finished, then hand the report to `observer`
    /// (once per run) and return it.
    pub fn run<O: SimObserver>(&mut self, env: &mut Environment, observer: &mut O) -> SimResult<RunReport> {
        while !self.is_finished(env)? {
            self.tick(env, observer)?;
        }

        let report = self.report(env);
        if !self.reported {
            self.reported = true;
            info!(
                tick = %report.finished_at,
                user_motes = report.motes.len(),
                total_cost = report.total_cost(),
                "run finished"
            );
            observer.on_run_end(&report);
        }
        Ok(report)
    }

    /// Step exactly `n` ticks, ignoring completion.
    pub fn run_ticks<O: SimObserver>(&mut self, env: &mut Environment, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(env, observer)?;
        }
        Ok(())
    }

    fn tick<O: SimObserver>(&mut self, env: &mut Environment, observer: &mut O) -> SimResult<()> {
        let now = env.now();
        observer.on_tick_start(now);
        let outcome = self.step(env)?;
        observer.on_tick_end(now, outcome.moved);
        if outcome.snapshot {
            observer.on_snapshot(now, &self.information);
        }
        Ok(())
    }
}
