//! Source of corrective next hops for motes whose path ran out.

use ms_core::{GeoPoint, MoteId};
use ms_fleet::Environment;
use ms_spatial::Router;

use crate::{MobilityError, MobilityResult};

/// Supplies a fresh route for a mote.  Only index 1 of the returned route
/// (the next sensible hop) is used.
pub trait RoutingApplication {
    fn route(&self, env: &Environment, mote: MoteId) -> MobilityResult<Vec<GeoPoint>>;
}

impl<F> RoutingApplication for F
where
    F: Fn(&Environment, MoteId) -> MobilityResult<Vec<GeoPoint>>,
{
    fn route(&self, env: &Environment, mote: MoteId) -> MobilityResult<Vec<GeoPoint>> {
        self(env, mote)
    }
}

/// Routes over the environment's waypoint graph from the mote's current
/// position to its destination (or the end of its path).
pub struct GraphRoutingApplication<R: Router> {
    pub router: R,
}

impl<R: Router> GraphRoutingApplication<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }
}

impl<R: Router> RoutingApplication for GraphRoutingApplication<R> {
    fn route(&self, env: &Environment, mote: MoteId) -> MobilityResult<Vec<GeoPoint>> {
        let m = env.mote(mote)?;
        let goal = m
            .destination
            .or_else(|| m.path().last().copied())
            .ok_or(MobilityError::NoRecoveryHop(mote))?;

        let from  = env.graph.snap(env.projection.to_geo(m.position()))?;
        let to    = env.graph.snap(goal)?;
        let route = self.router.route(&env.graph, from, to)?;
        Ok(route.positions(&env.graph))
    }
}
