//! Neighbour-cost heuristics used to estimate route costs.

use ms_core::GeoPoint;
use ms_spatial::WaypointGraph;

/// Estimated cost of travelling between two adjacent points.
///
/// Implemented for any `Fn(GeoPoint, GeoPoint) -> f64`, so tests and
/// applications can pass a closure instead of a named type.
pub trait RoutingHeuristic {
    fn cost_between(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

impl<F> RoutingHeuristic for F
where
    F: Fn(GeoPoint, GeoPoint) -> f64,
{
    #[inline]
    fn cost_between(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self(from, to)
    }
}

/// Great-circle distance in metres.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceHeuristic;

impl RoutingHeuristic for DistanceHeuristic {
    fn cost_between(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        from.distance_m(to)
    }
}

/// Distance scaled by the weight of the graph connection joining the two
/// points (e.g. an air-quality factor).  Falls back to plain distance when
/// the points are not directly connected.
pub struct GraphHeuristic<'g> {
    graph: &'g WaypointGraph,
}

impl<'g> GraphHeuristic<'g> {
    pub fn new(graph: &'g WaypointGraph) -> Self {
        Self { graph }
    }
}

impl RoutingHeuristic for GraphHeuristic<'_> {
    fn cost_between(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        let distance = from.distance_m(to);
        let conn = self
            .graph
            .closest_waypoint(from)
            .zip(self.graph.closest_waypoint(to))
            .and_then(|(a, b)| self.graph.connection_between(a, b));
        match conn {
            Some(c) => distance * self.graph.conn_weight[c.index()],
            None    => distance,
        }
    }
}
