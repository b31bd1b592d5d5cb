//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The recovery path of the progression engine asks for routes through the
//! [`Router`] trait, so applications can swap in A*, contraction
//! hierarchies, or a pollution-aware planner without touching the engine.
//!
//! # Cost units
//!
//! Dijkstra runs on integer millimetre-weighted costs
//! (`length_m * weight * 1000`) so heap ordering is total and tie-breaking
//! deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ms_core::{ConnectionId, GeoPoint, WaypointId};

use crate::graph::WaypointGraph;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Start waypoint.
    pub origin: WaypointId,
    /// Connections to traverse in order.
    pub connections: Vec<ConnectionId>,
    /// Sum of weighted connection lengths in metres.
    pub total_cost: f64,
}

impl Route {
    /// `true` if origin and destination coincide.
    pub fn is_trivial(&self) -> bool {
        self.connections.is_empty()
    }

    /// Waypoints visited, origin included.
    pub fn waypoints(&self, graph: &WaypointGraph) -> Vec<WaypointId> {
        let mut out = Vec::with_capacity(self.connections.len() + 1);
        out.push(self.origin);
        out.extend(self.connections.iter().map(|c| graph.conn_to[c.index()]));
        out
    }

    /// Geographic positions visited, origin included.
    pub fn positions(&self, graph: &WaypointGraph) -> Vec<GeoPoint> {
        self.waypoints(graph)
            .into_iter()
            .map(|w| graph.waypoint_pos[w.index()])
            .collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so one router can be shared by
/// parallel scans.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.  `from == to` yields a trivial
    /// route, not an error.
    fn route(&self, graph: &WaypointGraph, from: WaypointId, to: WaypointId) -> SpatialResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR graph using weighted connection length.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &WaypointGraph, from: WaypointId, to: WaypointId) -> SpatialResult<Route> {
        dijkstra(graph, from, to)
    }
}

#[inline]
fn connection_cost_mm(graph: &WaypointGraph, conn: ConnectionId) -> u64 {
    (graph.conn_length_m[conn.index()] * graph.conn_weight[conn.index()] * 1000.0).max(0.0) as u64
}

fn dijkstra(graph: &WaypointGraph, from: WaypointId, to: WaypointId) -> SpatialResult<Route> {
    let n = graph.waypoint_count();
    for w in [from, to] {
        if w.index() >= n {
            return Err(SpatialError::WaypointNotFound(w));
        }
    }
    if from == to {
        return Ok(Route { origin: from, connections: vec![], total_cost: 0.0 });
    }

    let mut dist      = vec![u64::MAX; n];
    let mut prev_conn = vec![ConnectionId::INVALID; n];
    dist[from.index()] = 0;

    // Secondary key WaypointId gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, WaypointId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_conn, from, to));
        }
        if cost > dist[node.index()] {
            continue;
        }
        for conn in graph.out_connections(node) {
            let next     = graph.conn_to[conn.index()];
            let new_cost = cost.saturating_add(connection_cost_mm(graph, conn));
            if new_cost < dist[next.index()] {
                dist[next.index()]      = new_cost;
                prev_conn[next.index()] = conn;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    graph:     &WaypointGraph,
    prev_conn: &[ConnectionId],
    from:      WaypointId,
    to:        WaypointId,
) -> Route {
    let mut connections = Vec::new();
    let mut cur = to;
    while cur != from {
        let c = prev_conn[cur.index()];
        connections.push(c);
        cur = graph.conn_from[c.index()];
    }
    connections.reverse();
    let total_cost = connections
        .iter()
        .map(|c| graph.conn_length_m[c.index()] * graph.conn_weight[c.index()])
        .sum();
    Route { origin: from, connections, total_cost }
}
