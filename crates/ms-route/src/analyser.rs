//! Heuristic route comparison.

use ms_core::GeoPoint;

use crate::{DistanceHeuristic, RoutingHeuristic};

/// A route is only worth switching to, or counts as changed, when it beats
/// the reference by at least 5 %.
pub const IMPROVEMENT_THRESHOLD: f64 = 0.95;

/// A proposed route and the cost it was advertised with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteCandidate {
    pub declared_cost: f64,
    pub waypoints:     Vec<GeoPoint>,
}

impl RouteCandidate {
    pub fn new(declared_cost: f64, waypoints: Vec<GeoPoint>) -> Self {
        Self { declared_cost, waypoints }
    }
}

/// Compares routes using a neighbour-cost heuristic.
pub struct RouteAnalyser<H = DistanceHeuristic> {
    heuristic: H,
}

impl Default for RouteAnalyser<DistanceHeuristic> {
    fn default() -> Self {
        Self::new(DistanceHeuristic)
    }
}

impl<H: RoutingHeuristic> RouteAnalyser<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Sum of the heuristic over consecutive waypoint pairs.  Routes with
    /// fewer than two waypoints cost 0.
    pub fn heuristic_cost(&self, route: &[GeoPoint]) -> f64 {
        route
            .windows(2)
            .map(|w| self.heuristic.cost_between(w[0], w[1]))
            .fold(0.0, |acc, c| acc + c)
    }

    /// `false` when `b`'s declared cost is strictly below 95 % of `a`'s
    /// heuristic cost; `true` otherwise (including equality).
    pub fn is_better_path(&self, a: &RouteCandidate, b: &RouteCandidate) -> bool {
        IMPROVEMENT_THRESHOLD * self.heuristic_cost(&a.waypoints) <= b.declared_cost
    }

    /// `true` when the candidate's recomputed heuristic cost is at most 95 %
    /// of its declared cost.
    pub fn has_changed_enough(&self, candidate: &RouteCandidate) -> bool {
        IMPROVEMENT_THRESHOLD * candidate.declared_cost >= self.heuristic_cost(&candidate.waypoints)
    }
}
