//! Simulation observer trait for progress reporting and data collection.

use ms_core::Tick;
use ms_route::InformationTable;

use crate::RunReport;

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — cost printer
///
/// ```rust,ignore
/// struct CostPrinter;
///
/// impl SimObserver for CostPrinter {
///     fn on_run_end(&mut self, report: &RunReport) {
///         println!("{report}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `moved` is the number of motes that
    /// changed position.
    fn on_tick_end(&mut self, _tick: Tick, _moved: usize) {}

    /// Called after each information snapshot with the full table so far.
    fn on_snapshot(&mut self, _tick: Tick, _information: &InformationTable) {}

    /// Called once per run, when it finishes.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
