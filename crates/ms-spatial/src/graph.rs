//! Waypoint navigation graph and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing
//! connections.  Given a `WaypointId w`, its outgoing connections occupy:
//!
//! ```text
//! conn_from[ out_start[w] .. out_start[w+1] ]
//! ```
//!
//! All connection arrays are sorted by source waypoint and indexed by
//! `ConnectionId`, so scanning a waypoint's neighbours is a contiguous
//! memory walk.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `WaypointId`.
//! Paths are sequences of raw `GeoPoint`s; the index snaps each point back
//! onto the graph when a connection between two path points is needed.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ms_core::{ConnectionId, GeoPoint, WaypointId};

use crate::{SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct WaypointEntry {
    point: [f64; 2], // [lat, lon]
    id:    WaypointId,
}

impl RTreeObject for WaypointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for WaypointEntry {
    /// Squared Euclidean distance in lat/lon space; fine for nearest-point
    /// queries at city scale.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Directed waypoint graph in CSR format plus a spatial index for snapping.
///
/// Do not construct directly; use [`WaypointGraphBuilder`].
pub struct WaypointGraph {
    /// Geographic position of each waypoint.  Indexed by `WaypointId`.
    pub waypoint_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Length = `waypoint_count + 1`.
    pub out_start: Vec<u32>,

    /// Source waypoint of each connection.
    pub conn_from: Vec<WaypointId>,

    /// Destination waypoint of each connection.
    pub conn_to: Vec<WaypointId>,

    /// Great-circle length of each connection in metres.
    pub conn_length_m: Vec<f64>,

    /// Cost multiplier of each connection (1.0 = plain distance).  External
    /// models such as air-quality grids write their factor here.
    pub conn_weight: Vec<f64>,

    spatial_idx: RTree<WaypointEntry>,
}

impl WaypointGraph {
    /// A graph with no waypoints or connections.
    pub fn empty() -> Self {
        WaypointGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn waypoint_count(&self) -> usize {
        self.waypoint_pos.len()
    }

    pub fn connection_count(&self) -> usize {
        self.conn_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoint_pos.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Every connection id in ascending order.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        (0..self.connection_count() as u32).map(ConnectionId)
    }

    /// Outgoing connections of `waypoint` (contiguous range, no allocation).
    #[inline]
    pub fn out_connections(&self, waypoint: WaypointId) -> impl Iterator<Item = ConnectionId> + '_ {
        let start = self.out_start[waypoint.index()] as usize;
        let end   = self.out_start[waypoint.index() + 1] as usize;
        (start..end).map(|i| ConnectionId(i as u32))
    }

    /// The connection leading from `from` directly to `to`, if one exists.
    pub fn connection_between(&self, from: WaypointId, to: WaypointId) -> Option<ConnectionId> {
        if from.index() >= self.waypoint_count() {
            return None;
        }
        self.out_connections(from)
            .find(|c| self.conn_to[c.index()] == to)
    }

    /// Endpoints `(from, to)` of `conn`.
    #[inline]
    pub fn endpoints(&self, conn: ConnectionId) -> (WaypointId, WaypointId) {
        (self.conn_from[conn.index()], self.conn_to[conn.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The waypoint nearest to `pos`, or `None` for an empty graph.
    pub fn closest_waypoint(&self, pos: GeoPoint) -> Option<WaypointId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Like [`closest_waypoint`](Self::closest_waypoint) but an error when
    /// the graph is empty.
    pub fn snap(&self, pos: GeoPoint) -> SpatialResult<WaypointId> {
        self.closest_waypoint(pos).ok_or(SpatialError::EmptyGraph(pos))
    }
}

// ── WaypointGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`WaypointGraph`] incrementally, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ms_core::GeoPoint;
/// use ms_spatial::WaypointGraphBuilder;
///
/// let mut b = WaypointGraphBuilder::new();
/// let a = b.add_waypoint(GeoPoint::new(50.870, 4.700));
/// let c = b.add_waypoint(GeoPoint::new(50.871, 4.700));
/// b.add_link(a, c, 1.0);
/// let graph = b.build();
/// assert_eq!(graph.waypoint_count(), 2);
/// assert_eq!(graph.connection_count(), 2); // bidirectional
/// ```
pub struct WaypointGraphBuilder {
    waypoints: Vec<GeoPoint>,
    raw:       Vec<RawConnection>,
}

struct RawConnection {
    from:   WaypointId,
    to:     WaypointId,
    weight: f64,
}

impl WaypointGraphBuilder {
    pub fn new() -> Self {
        Self { waypoints: Vec::new(), raw: Vec::new() }
    }

    /// Add a waypoint and return its `WaypointId` (sequential from 0).
    pub fn add_waypoint(&mut self, pos: GeoPoint) -> WaypointId {
        let id = WaypointId(self.waypoints.len() as u32);
        self.waypoints.push(pos);
        id
    }

    /// Add a **directed** connection with cost multiplier `weight`.
    pub fn add_connection(&mut self, from: WaypointId, to: WaypointId, weight: f64) {
        self.raw.push(RawConnection { from, to, weight });
    }

    /// Add connections in both directions.
    pub fn add_link(&mut self, a: WaypointId, b: WaypointId, weight: f64) {
        self.add_connection(a, b, weight);
        self.add_connection(b, a, weight);
    }

    pub fn waypoint_count(&self) -> usize { self.waypoints.len() }
    pub fn connection_count(&self) -> usize { self.raw.len() }

    /// Consume the builder and produce a [`WaypointGraph`].
    ///
    /// Connections are stably sorted by source waypoint, so connections
    /// sharing a source keep their insertion order.
    pub fn build(self) -> WaypointGraph {
        let waypoint_count   = self.waypoints.len();
        let connection_count = self.raw.len();

        let mut raw = self.raw;
        raw.sort_by_key(|c| c.from.0);

        let conn_from: Vec<WaypointId> = raw.iter().map(|c| c.from).collect();
        let conn_to:   Vec<WaypointId> = raw.iter().map(|c| c.to).collect();
        let conn_weight: Vec<f64>      = raw.iter().map(|c| c.weight).collect();
        let conn_length_m: Vec<f64> = raw
            .iter()
            .map(|c| self.waypoints[c.from.index()].distance_m(self.waypoints[c.to.index()]))
            .collect();

        let mut out_start = vec![0u32; waypoint_count + 1];
        for c in &raw {
            out_start[c.from.index() + 1] += 1;
        }
        for i in 1..=waypoint_count {
            out_start[i] += out_start[i - 1];
        }
        debug_assert_eq!(out_start[waypoint_count] as usize, connection_count);

        let entries: Vec<WaypointEntry> = self
            .waypoints
            .iter()
            .enumerate()
            .map(|(i, &pos)| WaypointEntry {
                point: [pos.lat, pos.lon],
                id:    WaypointId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        WaypointGraph {
            waypoint_pos: self.waypoints,
            out_start,
            conn_from,
            conn_to,
            conn_length_m,
            conn_weight,
            spatial_idx,
        }
    }
}

impl Default for WaypointGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
