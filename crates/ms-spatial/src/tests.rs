//! Unit tests for ms-spatial.
//!
//! All tests use hand-crafted graphs.

#[cfg(test)]
mod helpers {
    use ms_core::{GeoPoint, WaypointId};
    use crate::{WaypointGraph, WaypointGraphBuilder};

    /// Small grid:
    ///
    ///   0:(0,0) ─ 1:(0,0.001) ─ 2:(0,0.002)
    ///   │                        │
    ///   3:(0.001,0) ─────────── 4:(0.001,0.002)
    ///
    /// Links 0-1, 1-2, 2-4 have weight 1; 0-3 has weight 10 so the top row
    /// is always the cheapest way from 0 to 4.
    pub fn grid() -> (WaypointGraph, [WaypointId; 5]) {
        let mut b = WaypointGraphBuilder::new();
        let w0 = b.add_waypoint(GeoPoint::new(0.0,   0.0));
        let w1 = b.add_waypoint(GeoPoint::new(0.0,   0.001));
        let w2 = b.add_waypoint(GeoPoint::new(0.0,   0.002));
        let w3 = b.add_waypoint(GeoPoint::new(0.001, 0.0));
        let w4 = b.add_waypoint(GeoPoint::new(0.001, 0.002));
        b.add_link(w0, w1, 1.0);
        b.add_link(w1, w2, 1.0);
        b.add_link(w2, w4, 1.0);
        b.add_link(w0, w3, 10.0);
        b.add_link(w3, w4, 1.0);
        (b.build(), [w0, w1, w2, w3, w4])
    }
}

#[cfg(test)]
mod graph {
    use ms_core::{GeoPoint, WaypointId};
    use crate::WaypointGraphBuilder;

    #[test]
    fn empty_build() {
        let g = WaypointGraphBuilder::new().build();
        assert_eq!(g.waypoint_count(), 0);
        assert_eq!(g.connection_count(), 0);
        assert!(g.is_empty());
        assert!(g.closest_waypoint(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn csr_out_connections() {
        let (g, [w0, w1, _, w3, w4]) = super::helpers::grid();
        assert_eq!(g.out_connections(w1).count(), 2);
        assert_eq!(g.out_connections(w0).count(), 2);
        assert_eq!(g.out_connections(w4).count(), 2);
        for c in g.out_connections(w3) {
            assert_eq!(g.conn_from[c.index()], w3);
        }
    }

    #[test]
    fn connection_between_is_directed_lookup() {
        let (g, [w0, w1, w2, ..]) = super::helpers::grid();
        let c = g.connection_between(w0, w1).expect("0→1 exists");
        assert_eq!(g.endpoints(c), (w0, w1));
        assert!(g.connection_between(w0, w2).is_none());
        assert!(g.connection_between(WaypointId(99), w0).is_none());
    }

    #[test]
    fn lengths_are_haversine() {
        let (g, [w0, w1, ..]) = super::helpers::grid();
        let c = g.connection_between(w0, w1).unwrap();
        // 0.001° of longitude at the equator ≈ 111 m.
        assert!((g.conn_length_m[c.index()] - 111.19).abs() < 0.5);
    }

    #[test]
    fn closest_waypoint_snaps() {
        let (g, [_, _, w2, ..]) = super::helpers::grid();
        assert_eq!(g.closest_waypoint(GeoPoint::new(0.0001, 0.0019)), Some(w2));
        assert_eq!(g.snap(GeoPoint::new(0.0, 0.002)).unwrap(), w2);
    }

    #[test]
    fn connections_iterates_all() {
        let (g, _) = super::helpers::grid();
        assert_eq!(g.connections().count(), 10);
    }
}

#[cfg(test)]
mod router {
    use ms_core::WaypointId;
    use crate::{DijkstraRouter, Router, SpatialError, WaypointGraphBuilder};

    #[test]
    fn prefers_cheaper_weighted_path() {
        let (g, [w0, w1, w2, _, w4]) = super::helpers::grid();
        let route = DijkstraRouter.route(&g, w0, w4).unwrap();
        assert_eq!(route.waypoints(&g), vec![w0, w1, w2, w4]);
        assert_eq!(route.connections.len(), 3);
    }

    #[test]
    fn same_node_is_trivial() {
        let (g, [w0, ..]) = super::helpers::grid();
        let route = DijkstraRouter.route(&g, w0, w0).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.positions(&g).len(), 1);
    }

    #[test]
    fn disconnected_is_no_route() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_waypoint(ms_core::GeoPoint::new(0.0, 0.0));
        let c = b.add_waypoint(ms_core::GeoPoint::new(1.0, 1.0));
        let g = b.build();
        assert!(matches!(
            DijkstraRouter.route(&g, a, c),
            Err(SpatialError::NoRoute { .. })
        ));
    }

    #[test]
    fn unknown_waypoint_errors() {
        let (g, [w0, ..]) = super::helpers::grid();
        assert!(matches!(
            DijkstraRouter.route(&g, w0, WaypointId(42)),
            Err(SpatialError::WaypointNotFound(_))
        ));
    }
}
