//! Lifecycle management for the external feedback loop.
//!
//! The decision logic of a feedback loop lives outside the engine; the
//! simulation only needs to start and stop it and to know which
//! [`Strategy`] it follows.

use tracing::info;

/// What kind of feedback loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Records per-connection cost snapshots; never steers motes.
    InformationGathering,
    /// Adapts the running system.
    Adaptive,
}

/// An externally implemented control loop.
pub trait FeedbackLoop {
    fn name(&self) -> &str;
    fn strategy(&self) -> Strategy;
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// The passive loop that turns on information snapshots.
#[derive(Debug, Default)]
pub struct InformationGatheringLoop {
    running: bool,
}

impl InformationGatheringLoop {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackLoop for InformationGatheringLoop {
    fn name(&self) -> &str {
        "information gathering"
    }

    fn strategy(&self) -> Strategy {
        Strategy::InformationGathering
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Owns at most one active [`FeedbackLoop`].
#[derive(Default)]
pub struct AdaptationManager {
    active: Option<Box<dyn FeedbackLoop>>,
}

impl AdaptationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the current loop (if any), then start and install `next`.
    pub fn set(&mut self, mut next: Box<dyn FeedbackLoop>) {
        if let Some(prev) = self.active.as_mut() {
            prev.stop();
            info!(name = prev.name(), "feedback loop stopped");
        }
        next.start();
        info!(name = next.name(), strategy = ?next.strategy(), "feedback loop started");
        self.active = Some(next);
    }

    /// Stop and remove the current loop.  Returns it, stopped.
    pub fn clear(&mut self) -> Option<Box<dyn FeedbackLoop>> {
        let mut prev = self.active.take()?;
        prev.stop();
        info!(name = prev.name(), "feedback loop stopped");
        Some(prev)
    }

    pub fn name(&self) -> Option<&str> {
        self.active.as_deref().map(|l| l.name())
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.active.as_deref().map(|l| l.strategy())
    }

    pub fn is_running(&self) -> bool {
        self.active.as_deref().is_some_and(|l| l.is_running())
    }

    /// `true` while a running loop follows [`Strategy::InformationGathering`].
    pub fn is_gathering(&self) -> bool {
        self.is_running() && self.strategy() == Some(Strategy::InformationGathering)
    }
}
