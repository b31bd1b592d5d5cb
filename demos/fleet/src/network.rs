//! Synthetic waypoint graph around the Leuven campus.

use ms_core::{GeoPoint, WaypointId};
use ms_spatial::{WaypointGraph, WaypointGraphBuilder};

/// Build the 6-waypoint demo graph.
///
/// ```text
///   w3
///   │
///   w2 ── w5
///   │     │
///   w1 ── w4
///   │
///   w0
/// ```
///
/// The `w1 ── w4` street carries a pollution weight of 2.5.
pub fn build_graph() -> (WaypointGraph, [WaypointId; 6]) {
    let mut b = WaypointGraphBuilder::new();

    let w0 = b.add_waypoint(GeoPoint::new(50.8700, 4.7000));
    let w1 = b.add_waypoint(GeoPoint::new(50.8710, 4.7000));
    let w2 = b.add_waypoint(GeoPoint::new(50.8720, 4.7000));
    let w3 = b.add_waypoint(GeoPoint::new(50.8730, 4.7000));
    let w4 = b.add_waypoint(GeoPoint::new(50.8710, 4.7015));
    let w5 = b.add_waypoint(GeoPoint::new(50.8720, 4.7015));

    b.add_link(w0, w1, 1.0);
    b.add_link(w1, w2, 1.0);
    b.add_link(w2, w3, 1.0);
    b.add_link(w1, w4, 2.5);
    b.add_link(w4, w5, 1.0);
    b.add_link(w5, w2, 1.0);

    (b.build(), [w0, w1, w2, w3, w4, w5])
}
