//! Fluent builder for constructing a [`Simulation`].

use ms_core::SimConfig;
use ms_mobility::RoutingApplication;
use ms_route::{CostModel, LengthCost};

use crate::{FeedbackLoop, InputProfile, SimResult, Simulation};

/// Fluent builder for [`Simulation<A, C>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, tick duration, snapshot interval, gathering budget
/// - `A: RoutingApplication` — source of corrective hops (e.g.
///   [`ms_mobility::GraphRoutingApplication`])
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                               |
/// |--------------------|---------------------------------------|
/// | `.profile(p)`      | `InputProfile::default()` (all motes) |
/// | `.cost_model(c)`   | [`LengthCost`]                        |
/// | `.adaptation(l)`   | no feedback loop                      |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, GraphRoutingApplication::new(DijkstraRouter))
///     .profile(profile)
///     .cost_model(WeightedCost)
///     .adaptation(Box::new(InformationGatheringLoop::new()))
///     .build()?;
/// ```
pub struct SimBuilder<A: RoutingApplication, C: CostModel = LengthCost> {
    config:     SimConfig,
    routing:    A,
    cost:       C,
    profile:    Option<InputProfile>,
    adaptation: Option<Box<dyn FeedbackLoop>>,
}

impl<A: RoutingApplication> SimBuilder<A, LengthCost> {
    pub fn new(config: SimConfig, routing: A) -> Self {
        Self {
            config,
            routing,
            cost:       LengthCost,
            profile:    None,
            adaptation: None,
        }
    }
}

impl<A: RoutingApplication, C: CostModel> SimBuilder<A, C> {
    /// Charge traversals with `cost` instead of plain connection length.
    pub fn cost_model<C2: CostModel>(self, cost: C2) -> SimBuilder<A, C2> {
        SimBuilder {
            config:     self.config,
            routing:    self.routing,
            cost,
            profile:    self.profile,
            adaptation: self.adaptation,
        }
    }

    pub fn profile(mut self, profile: InputProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Start `feedback` as soon as the simulation is built.
    pub fn adaptation(mut self, feedback: Box<dyn FeedbackLoop>) -> Self {
        self.adaptation = Some(feedback);
        self
    }

    /// Validate the configuration and profile and return a [`Simulation`]
    /// ready for run setup.
    pub fn build(self) -> SimResult<Simulation<A, C>> {
        self.config.validate()?;
        let profile = self.profile.unwrap_or_default();
        profile.validate()?;

        let mut sim = Simulation::new(self.config, profile, self.routing, self.cost);
        if let Some(feedback) = self.adaptation {
            sim.set_adaptation(feedback);
        }
        Ok(sim)
    }
}
