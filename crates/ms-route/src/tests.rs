//! Unit tests for ms-route.

use ms_core::{ConnectionId, GeoPoint, MoteId, WaypointId};
use ms_spatial::{WaypointGraph, WaypointGraphBuilder};

use crate::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Three waypoints on the equator, 0.001° apart, linked both ways:
///
///   0 ── 1 ── 2
///
/// The 1-2 link has weight 3.
fn line() -> (WaypointGraph, [GeoPoint; 3]) {
    let pts = [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 0.001),
        GeoPoint::new(0.0, 0.002),
    ];
    let mut b = WaypointGraphBuilder::new();
    let w: Vec<WaypointId> = pts.iter().map(|&p| b.add_waypoint(p)).collect();
    b.add_link(w[0], w[1], 1.0);
    b.add_link(w[1], w[2], 3.0);
    (b.build(), pts)
}

fn conn(g: &WaypointGraph, from: u32, to: u32) -> ConnectionId {
    g.connection_between(WaypointId(from), WaypointId(to)).unwrap()
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod evaluator {
    use super::*;

    #[test]
    fn first_index_charges_nothing() {
        let (g, pts) = line();
        let mut ev = RouteEvaluator::new(LengthCost);
        let charged = ev.add_cost_of_connection(&g, MoteId(0), &pts, 0).unwrap();
        assert_eq!(charged, 0.0);
        assert_eq!(ev.total_cost_path(MoteId(0)), 0.0);
        assert!(ev.known_connections().is_empty());
    }

    #[test]
    fn charges_connection_length() {
        let (g, pts) = line();
        let mut ev = RouteEvaluator::new(LengthCost);
        let c01 = conn(&g, 0, 1);

        let charged = ev.add_cost_of_connection(&g, MoteId(0), &pts, 1).unwrap();
        assert_eq!(charged, g.conn_length_m[c01.index()]);
        assert_eq!(ev.cost_connection(c01), charged);
        assert_eq!(ev.total_cost_path(MoteId(0)), charged);
        assert_eq!(ev.traversed(MoteId(0)), &[c01]);
    }

    #[test]
    fn weighted_model_scales_by_weight() {
        let (g, pts) = line();
        let mut ev = RouteEvaluator::new(WeightedCost);
        let c12 = conn(&g, 1, 2);
        let charged = ev.add_cost_of_connection(&g, MoteId(0), &pts, 2).unwrap();
        assert_eq!(charged, g.conn_length_m[c12.index()] * 3.0);
    }

    #[test]
    fn total_is_sum_of_charges() {
        let (g, pts) = line();
        let mut ev = RouteEvaluator::new(LengthCost);
        let a = ev.add_cost_of_connection(&g, MoteId(0), &pts, 1).unwrap();
        let b = ev.add_cost_of_connection(&g, MoteId(0), &pts, 2).unwrap();
        let other = ev.add_cost_of_connection(&g, MoteId(1), &pts, 1).unwrap();

        assert_eq!(ev.total_cost_path(MoteId(0)), a + b);
        assert_eq!(ev.total_cost_path(MoteId(1)), other);
        // Both motes crossed 0→1.
        assert_eq!(ev.cost_connection(conn(&g, 0, 1)), a + other);
        assert_eq!(ev.known_connections().len(), 2);
    }

    #[test]
    fn same_waypoint_is_free() {
        let (g, pts) = line();
        let path = [pts[1], GeoPoint::new(0.0, 0.00101)];
        let mut ev = RouteEvaluator::new(LengthCost);
        assert_eq!(ev.add_cost_of_connection(&g, MoteId(0), &path, 1).unwrap(), 0.0);
        assert!(ev.traversed(MoteId(0)).is_empty());
    }

    #[test]
    fn missing_connection_is_error_and_leaves_ledger() {
        let (g, pts) = line();
        let path = [pts[0], pts[2]];
        let mut ev = RouteEvaluator::new(LengthCost);
        let err = ev.add_cost_of_connection(&g, MoteId(0), &path, 1).unwrap_err();
        assert!(matches!(err, RouteError::NoConnection { .. }));
        assert_eq!(ev.total_cost_path(MoteId(0)), 0.0);
        assert!(ev.known_connections().is_empty());
    }

    #[test]
    fn index_past_end_is_error() {
        let (g, pts) = line();
        let ev = RouteEvaluator::new(LengthCost);
        let err = ev.quote(&g, MoteId(0), &pts, 3).unwrap_err();
        assert!(matches!(err, RouteError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn empty_graph_is_spatial_error() {
        let (_, pts) = line();
        let ev = RouteEvaluator::new(LengthCost);
        let err = ev.quote(&WaypointGraph::empty(), MoteId(0), &pts, 1).unwrap_err();
        assert!(matches!(err, RouteError::Spatial(_)));
    }

    #[test]
    fn quote_does_not_mutate() {
        let (g, pts) = line();
        let ev = RouteEvaluator::new(LengthCost);
        let charge = ev.quote(&g, MoteId(4), &pts, 1).unwrap();
        assert_eq!(charge.connection, Some(conn(&g, 0, 1)));
        assert_eq!(ev.total_cost_path(MoteId(4)), 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let (g, pts) = line();
        let mut ev = RouteEvaluator::new(LengthCost);
        ev.add_cost_of_connection(&g, MoteId(0), &pts, 1).unwrap();
        ev.reset();
        assert_eq!(ev.total_cost_path(MoteId(0)), 0.0);
        assert_eq!(ev.cost_connection(conn(&g, 0, 1)), 0.0);
        assert!(ev.traversed(MoteId(0)).is_empty());
    }
}

// ── Information table ─────────────────────────────────────────────────────────

#[cfg(test)]
mod information {
    use super::*;

    #[test]
    fn snapshot_covers_every_connection() {
        let (g, pts) = line();
        let mut ev = RouteEvaluator::new(LengthCost);
        let mut table = InformationTable::new();

        ev.update_information(&mut table, &g);
        assert_eq!(table.len(), g.connection_count());
        assert!(table.iter().all(|(_, s)| s == [0.0]));

        let charged = ev.add_cost_of_connection(&g, MoteId(0), &pts, 1).unwrap();
        ev.update_information(&mut table, &g);

        let c01 = conn(&g, 0, 1);
        assert_eq!(table.samples(c01), &[0.0, charged]);
        assert_eq!(table.samples(conn(&g, 1, 0)), &[0.0, 0.0]);
    }

    #[test]
    fn iteration_is_ordered() {
        let mut table = InformationTable::new();
        table.record(ConnectionId(5), 1.0);
        table.record(ConnectionId(1), 2.0);
        table.record(ConnectionId(3), 3.0);
        let ids: Vec<_> = table.iter().map(|(c, _)| c.0).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn unknown_connection_has_no_samples() {
        let table = InformationTable::new();
        assert!(table.samples(ConnectionId(0)).is_empty());
        assert!(table.is_empty());
    }
}

// ── Analyser ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod analyser {
    use super::*;

    fn pts(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(0.0, i as f64 * 0.001)).collect()
    }

    #[test]
    fn short_routes_cost_nothing() {
        let a = RouteAnalyser::new(DistanceHeuristic);
        assert_eq!(a.heuristic_cost(&[]), 0.0);
        assert_eq!(a.heuristic_cost(&pts(1)), 0.0);
    }

    #[test]
    fn heuristic_sums_pairs() {
        let a = RouteAnalyser::new(|_: GeoPoint, _: GeoPoint| 10.0);
        assert_eq!(a.heuristic_cost(&pts(4)), 30.0);
    }

    #[test]
    fn distance_heuristic_matches_haversine() {
        let a = RouteAnalyser::new(DistanceHeuristic);
        let route = pts(2);
        assert_eq!(a.heuristic_cost(&route), route[0].distance_m(route[1]));
    }

    #[test]
    fn better_path_boundary() {
        let a = RouteAnalyser::new(|_: GeoPoint, _: GeoPoint| 10.0);
        let current = RouteCandidate::new(0.0, pts(3));
        let boundary = IMPROVEMENT_THRESHOLD * a.heuristic_cost(&current.waypoints);

        assert!(a.is_better_path(&current, &RouteCandidate::new(boundary, pts(2))));
        assert!(a.is_better_path(&current, &RouteCandidate::new(boundary + 1.0, pts(2))));
        assert!(!a.is_better_path(&current, &RouteCandidate::new(boundary - 1.0, pts(2))));
    }

    #[test]
    fn changed_enough_boundary() {
        let declared = 20.0;
        let per_pair = IMPROVEMENT_THRESHOLD * declared;
        let a = RouteAnalyser::new(move |_: GeoPoint, _: GeoPoint| per_pair);

        assert!(a.has_changed_enough(&RouteCandidate::new(declared, pts(2))));
        assert!(a.has_changed_enough(&RouteCandidate::new(declared + 1.0, pts(2))));
        assert!(!a.has_changed_enough(&RouteCandidate::new(declared - 1.0, pts(2))));
    }

    #[test]
    fn graph_heuristic_uses_weights() {
        let (g, p) = line();
        let h = GraphHeuristic::new(&g);
        let plain = p[1].distance_m(p[2]);
        assert!((h.cost_between(p[1], p[2]) - plain * 3.0).abs() < 1e-9);
        // Not directly connected: plain distance.
        assert_eq!(h.cost_between(p[0], p[2]), p[0].distance_m(p[2]));
    }
}
