//! Connection cost ledger.
//!
//! # Two-phase charging
//!
//! Charging a traversal is split into [`RouteEvaluator::quote`] (fallible,
//! read-only) and [`RouteEvaluator::apply`] (infallible).  The progression
//! engine quotes a mote's cost before touching the mote, so a failed
//! connection lookup leaves the mote, its progress state and the ledger as
//! they were.

use std::collections::BTreeMap;

use ms_core::{ConnectionId, GeoPoint, MoteId};
use ms_spatial::WaypointGraph;
use tracing::trace;

use crate::{CostModel, LengthCost, RouteError, RouteResult};

#[cfg(feature = "fx-hash")]
type CostMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type CostMap<K, V> = std::collections::HashMap<K, V>;

// ── CostCharge ────────────────────────────────────────────────────────────────

/// A quoted, not yet applied, traversal charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostCharge {
    pub mote: MoteId,
    /// `None` when nothing was traversed (first waypoint, or both points
    /// snap to the same waypoint).
    pub connection: Option<ConnectionId>,
    pub cost: f64,
}

impl CostCharge {
    pub fn none(mote: MoteId) -> Self {
        Self { mote, connection: None, cost: 0.0 }
    }
}

// ── RouteEvaluator ────────────────────────────────────────────────────────────

/// Accumulates the measured cost of every connection traversed by user motes
/// during one run.
///
/// Invariant: a mote's [`total_cost_path`](Self::total_cost_path) equals the
/// sum of the charges applied for it since the last [`reset`](Self::reset).
pub struct RouteEvaluator<C = LengthCost> {
    model:            C,
    connection_costs: CostMap<ConnectionId, f64>,
    mote_costs:       CostMap<MoteId, f64>,
    traversed:        CostMap<MoteId, Vec<ConnectionId>>,
}

impl Default for RouteEvaluator<LengthCost> {
    fn default() -> Self {
        Self::new(LengthCost)
    }
}

impl<C: CostModel> RouteEvaluator<C> {
    pub fn new(model: C) -> Self {
        Self {
            model,
            connection_costs: CostMap::default(),
            mote_costs:       CostMap::default(),
            traversed:        CostMap::default(),
        }
    }

    pub fn model(&self) -> &C {
        &self.model
    }

    /// Clear all accumulated costs.
    pub fn reset(&mut self) {
        self.connection_costs.clear();
        self.mote_costs.clear();
        self.traversed.clear();
    }

    /// Price the traversal from `path[index - 1]` to `path[index]` without
    /// recording it.
    ///
    /// `index == 0` quotes nothing.  Both points are snapped to their
    /// closest waypoints; if those coincide nothing was traversed.
    pub fn quote(
        &self,
        graph: &WaypointGraph,
        mote:  MoteId,
        path:  &[GeoPoint],
        index: usize,
    ) -> RouteResult<CostCharge> {
        if index >= path.len() {
            return Err(RouteError::IndexOutOfRange { index, len: path.len() });
        }
        if index == 0 {
            return Ok(CostCharge::none(mote));
        }

        let from = graph.snap(path[index - 1])?;
        let to   = graph.snap(path[index])?;
        if from == to {
            return Ok(CostCharge::none(mote));
        }

        let conn = graph
            .connection_between(from, to)
            .ok_or(RouteError::NoConnection { from, to })?;
        Ok(CostCharge {
            mote,
            connection: Some(conn),
            cost: self.model.connection_cost(graph, conn),
        })
    }

    /// Record a quoted charge.
    pub fn apply(&mut self, charge: CostCharge) {
        let Some(conn) = charge.connection else {
            return;
        };
        *self.connection_costs.entry(conn).or_insert(0.0) += charge.cost;
        *self.mote_costs.entry(charge.mote).or_insert(0.0) += charge.cost;
        self.traversed.entry(charge.mote).or_default().push(conn);
        trace!(mote = %charge.mote, connection = %conn, cost = charge.cost, "charged");
    }

    /// Quote and apply in one step.  Returns the amount charged.
    pub fn add_cost_of_connection(
        &mut self,
        graph: &WaypointGraph,
        mote:  MoteId,
        path:  &[GeoPoint],
        index: usize,
    ) -> RouteResult<f64> {
        let charge = self.quote(graph, mote, path, index)?;
        self.apply(charge);
        Ok(charge.cost)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Total cost charged to `mote` since the last reset (0 if none).
    pub fn total_cost_path(&self, mote: MoteId) -> f64 {
        self.mote_costs.get(&mote).copied().unwrap_or(0.0)
    }

    /// Accumulated cost of `conn` since the last reset (0 if never charged).
    pub fn cost_connection(&self, conn: ConnectionId) -> f64 {
        self.connection_costs.get(&conn).copied().unwrap_or(0.0)
    }

    /// Connections charged to `mote`, in traversal order.
    pub fn traversed(&self, mote: MoteId) -> &[ConnectionId] {
        self.traversed.get(&mote).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every connection charged at least once, ascending.
    pub fn known_connections(&self) -> Vec<ConnectionId> {
        let mut conns: Vec<_> = self.connection_costs.keys().copied().collect();
        conns.sort_unstable();
        conns
    }

    /// Append the current accumulated cost of every graph connection to
    /// `table`.
    pub fn update_information(&self, table: &mut InformationTable, graph: &WaypointGraph) {
        for conn in graph.connections() {
            table.record(conn, self.cost_connection(conn));
        }
    }
}

// ── InformationTable ──────────────────────────────────────────────────────────

/// Per-connection history of accumulated-cost snapshots.
///
/// Append-only within a run; iteration is in ascending `ConnectionId` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InformationTable {
    samples: BTreeMap<ConnectionId, Vec<f64>>,
}

impl InformationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample for `conn`, creating its sequence if needed.
    pub fn record(&mut self, conn: ConnectionId, value: f64) {
        self.samples.entry(conn).or_default().push(value);
    }

    pub fn samples(&self, conn: ConnectionId) -> &[f64] {
        self.samples.get(&conn).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &[f64])> + '_ {
        self.samples.iter().map(|(&c, v)| (c, v.as_slice()))
    }

    /// Number of connections with at least one sample.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
