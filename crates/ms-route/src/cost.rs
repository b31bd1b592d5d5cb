//! Cost models: the measured cost charged when a mote traverses a
//! connection.

use ms_core::ConnectionId;
use ms_spatial::WaypointGraph;

/// Cost of traversing one graph connection.
pub trait CostModel {
    fn connection_cost(&self, graph: &WaypointGraph, conn: ConnectionId) -> f64;
}

/// Connection length in metres.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthCost;

impl CostModel for LengthCost {
    fn connection_cost(&self, graph: &WaypointGraph, conn: ConnectionId) -> f64 {
        graph.conn_length_m[conn.index()]
    }
}

/// Connection length multiplied by its weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCost;

impl CostModel for WeightedCost {
    fn connection_cost(&self, graph: &WaypointGraph, conn: ConnectionId) -> f64 {
        graph.conn_length_m[conn.index()] * graph.conn_weight[conn.index()]
    }
}
