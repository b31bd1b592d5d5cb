//! Unit tests for ms-mobility.
//!
//! Every scenario runs on a four-waypoint line with one-second ticks, so a
//! mote at the default speed (1 waypoint/s) is due on every tick after the
//! first.

use ms_core::{ConnectionId, GeoPoint, MapProjection, MoteId, SimClock, Tick, WaypointId};
use ms_fleet::{Environment, Mote, MoteKind, Packet};
use ms_route::{LengthCost, RouteEvaluator};
use ms_spatial::{DijkstraRouter, WaypointGraph, WaypointGraphBuilder};

use crate::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `0 ── 1 ── 2 ── 3` along the equator, 0.001° apart.
fn pts() -> [GeoPoint; 4] {
    [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 0.001),
        GeoPoint::new(0.0, 0.002),
        GeoPoint::new(0.0, 0.003),
    ]
}

fn line() -> WaypointGraph {
    let mut b = WaypointGraphBuilder::new();
    let w: Vec<WaypointId> = pts().iter().map(|&p| b.add_waypoint(p)).collect();
    for pair in w.windows(2) {
        b.add_link(pair[0], pair[1], 1.0);
    }
    b.build()
}

fn env_with(motes: Vec<Mote>) -> Environment {
    let mut env = Environment::new(line(), MapProjection::default(), SimClock::new(1_000));
    for m in motes {
        env.add_mote(m);
    }
    env
}

type GraphEngine = ProgressionEngine<GraphRoutingApplication<DijkstraRouter>>;

fn engine(env: &Environment) -> GraphEngine {
    let mut e = ProgressionEngine::new(GraphRoutingApplication::new(DijkstraRouter));
    e.setup(env);
    e
}

fn ledger() -> RouteEvaluator<LengthCost> {
    RouteEvaluator::new(LengthCost)
}

fn conn(env: &Environment, from: u32, to: u32) -> ConnectionId {
    env.graph.connection_between(WaypointId(from), WaypointId(to)).unwrap()
}

fn length(env: &Environment, from: u32, to: u32) -> f64 {
    env.graph.conn_length_m[conn(env, from, to).index()]
}

/// One engine step followed by one clock tick.
fn step<A: RoutingApplication>(
    engine: &mut ProgressionEngine<A>,
    env:    &mut Environment,
    ev:     &mut RouteEvaluator<LengthCost>,
) -> usize {
    let moved = engine.step_motes(env, ev).unwrap();
    env.advance(1);
    moved
}

fn at(env: &Environment, mote: MoteId, p: GeoPoint) -> bool {
    env.mote(mote).unwrap().position() == env.to_map(p)
}

// ── State & store ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use super::*;

    #[test]
    fn empty_store_reports_missing_state() {
        let store = ProgressStore::new();
        assert!(matches!(store.get(MoteId(0)), Err(MobilityError::MissingState(MoteId(0)))));
    }

    #[test]
    fn reset_seeds_fresh_states() {
        let mut store = ProgressStore::new();
        store.reset(3, Tick(7));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(MoteId(2)).unwrap(), &ProgressState::start(Tick(7)));

        store.get_mut(MoteId(0)).unwrap().phase = Phase::Stalled { retries: 1 };
        store.reset(1, Tick(0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(MoteId(0)).unwrap().phase, Phase::Advancing);
    }

    #[test]
    fn phase_retries() {
        assert_eq!(Phase::Advancing.retries(), 0);
        assert_eq!(Phase::Stalled { retries: 2 }.retries(), 2);
    }
}

// ── Progression ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod progression {
    use super::*;

    #[test]
    fn step_before_setup_fails() {
        let p = pts();
        let mut env = env_with(vec![Mote::new(1, MoteKind::User, vec![p[0], p[1]])]);
        let mut e = ProgressionEngine::new(GraphRoutingApplication::new(DijkstraRouter));
        let err = e.step_motes(&mut env, &mut ledger()).unwrap_err();
        assert!(matches!(err, MobilityError::MissingState(MoteId(0))));
    }

    #[test]
    fn user_mote_walks_path_and_is_charged() {
        let p = pts();
        let mut env = env_with(vec![Mote::new(1, MoteKind::User, vec![p[0], p[1], p[2]])]);
        let mut e  = engine(&env);
        let mut ev = ledger();
        let id = MoteId(0);

        // Tick 0: no time has elapsed yet.
        assert_eq!(step(&mut e, &mut env, &mut ev), 0);
        assert!(at(&env, id, p[0]));

        assert_eq!(step(&mut e, &mut env, &mut ev), 1);
        assert!(at(&env, id, p[1]));
        assert_eq!(ev.total_cost_path(id), length(&env, 0, 1));

        assert_eq!(step(&mut e, &mut env, &mut ev), 1);
        assert!(at(&env, id, p[2]));
        assert_eq!(ev.total_cost_path(id), length(&env, 0, 1) + length(&env, 1, 2));
        assert_eq!(ev.traversed(id), &[conn(&env, 0, 1), conn(&env, 1, 2)]);

        // Arrived: nothing more happens.
        assert!(env.all_motes_arrived());
        assert_eq!(step(&mut e, &mut env, &mut ev), 0);
    }

    #[test]
    fn speed_gates_moves() {
        let p = pts();
        let mote = Mote::new(1, MoteKind::User, vec![p[0], p[1]]).with_speed(0.5);
        let mut env = env_with(vec![mote]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        assert_eq!(step(&mut e, &mut env, &mut ev), 0); // T0
        assert_eq!(step(&mut e, &mut env, &mut ev), 0); // T1: 1000 ms < 2000 ms
        assert_eq!(step(&mut e, &mut env, &mut ev), 1); // T2
        assert!(at(&env, MoteId(0), p[1]));
    }

    #[test]
    fn movement_offset_delays_start() {
        let p = pts();
        let mote = Mote::new(1, MoteKind::User, vec![p[0], p[1]]).with_movement_offset(-2.0);
        let mut env = env_with(vec![mote]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        for _ in 0..3 {
            assert_eq!(step(&mut e, &mut env, &mut ev), 0); // T0..T2
        }
        assert_eq!(step(&mut e, &mut env, &mut ev), 1); // T3: 3000 ms > 2000 ms
    }

    #[test]
    fn sensor_mote_reaches_then_moves_without_charge() {
        let p = pts();
        let mut env = env_with(vec![Mote::new(1, MoteKind::Sensor, vec![p[0], p[1]])]);
        let mut e  = engine(&env);
        let mut ev = ledger();
        let id = MoteId(0);

        step(&mut e, &mut env, &mut ev); // T0
        assert_eq!(step(&mut e, &mut env, &mut ev), 0); // T1: count waypoint 0 as reached
        assert_eq!(e.state(id).unwrap().waypoint_index, 1);
        assert_eq!(step(&mut e, &mut env, &mut ev), 1); // T2: move to waypoint 1
        assert!(at(&env, id, p[1]));
        assert_eq!(ev.total_cost_path(id), 0.0);
        assert!(ev.known_connections().is_empty());
    }

    #[test]
    fn coinciding_waypoints_are_skipped() {
        let p = pts();
        let mut env = env_with(vec![Mote::new(1, MoteKind::User, vec![p[0], p[0], p[1]])]);
        let mut e  = engine(&env);
        let mut ev = ledger();
        let id = MoteId(0);

        step(&mut e, &mut env, &mut ev);
        assert_eq!(step(&mut e, &mut env, &mut ev), 1);
        assert!(at(&env, id, p[1]));
        assert_eq!(e.state(id).unwrap().waypoint_index, 2);
        assert_eq!(ev.total_cost_path(id), length(&env, 0, 1));
    }

    #[test]
    fn single_waypoint_path_never_progresses() {
        let p = pts();
        let mote = Mote::new(1, MoteKind::User, vec![p[0]]).with_destination(p[3]);
        let mut env = env_with(vec![mote]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        for _ in 0..4 {
            assert_eq!(step(&mut e, &mut env, &mut ev), 0);
        }
        assert!(at(&env, MoteId(0), p[0]));
        assert_eq!(env.mote(MoteId(0)).unwrap().path().len(), 1);
        assert_eq!(ev.total_cost_path(MoteId(0)), 0.0);
        assert_eq!(e.state(MoteId(0)).unwrap(), &ProgressState::start(Tick(0)));
    }

    #[test]
    fn empty_path_never_progresses() {
        let p = pts();
        let mote = Mote::new(1, MoteKind::User, Vec::new()).with_destination(p[3]);
        let mut env = env_with(vec![mote]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        for _ in 0..4 {
            assert_eq!(step(&mut e, &mut env, &mut ev), 0);
        }
        assert!(env.mote(MoteId(0)).unwrap().path().is_empty());
        assert_eq!(ev.total_cost_path(MoteId(0)), 0.0);
        assert!(ev.known_connections().is_empty());
    }

    #[test]
    fn disabled_motes_are_ignored() {
        let p = pts();
        let mote = Mote::new(1, MoteKind::User, vec![p[0], p[1]]).with_enabled(false);
        let mut env = env_with(vec![mote]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        step(&mut e, &mut env, &mut ev);
        assert_eq!(step(&mut e, &mut env, &mut ev), 0);
        assert!(at(&env, MoteId(0), p[0]));
    }

    #[test]
    fn pending_packets_are_consumed_even_when_not_due() {
        let p = pts();
        let mut env = env_with(vec![Mote::new(1, MoteKind::User, vec![p[0], p[1]])]);
        env.mote_mut(MoteId(0))
            .unwrap()
            .deliver(Packet { from: ms_core::GatewayId(0), payload: vec![1] });
        let mut e = engine(&env);

        // Tick 0: not due, but the inbox is drained.
        assert_eq!(e.step_motes(&mut env, &mut ledger()).unwrap(), 0);
        assert_eq!(env.mote(MoteId(0)).unwrap().pending_packets(), 0);
    }

    #[test]
    fn motes_advance_in_id_order_independently() {
        let p = pts();
        let mut env = env_with(vec![
            Mote::new(1, MoteKind::User, vec![p[0], p[1]]),
            Mote::new(2, MoteKind::User, vec![p[1], p[2], p[3]]),
        ]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        step(&mut e, &mut env, &mut ev);
        assert_eq!(step(&mut e, &mut env, &mut ev), 2);
        assert_eq!(ev.total_cost_path(MoteId(0)), length(&env, 0, 1));
        assert_eq!(ev.total_cost_path(MoteId(1)), length(&env, 1, 2));
        assert_eq!(ev.cost_connection(conn(&env, 1, 2)), length(&env, 1, 2));
    }
}

// ── Stall & recovery ──────────────────────────────────────────────────────────

#[cfg(test)]
mod recovery {
    use super::*;

    fn partial_path_env() -> Environment {
        let p = pts();
        let mote = Mote::new(1, MoteKind::User, vec![p[0], p[1]]).with_destination(p[3]);
        env_with(vec![mote])
    }

    #[test]
    fn exhausted_path_stalls_once_then_appends_hop() {
        let p = pts();
        let mut env = partial_path_env();
        let mut e  = engine(&env);
        let mut ev = ledger();
        let id = MoteId(0);

        step(&mut e, &mut env, &mut ev); // T0
        assert_eq!(step(&mut e, &mut env, &mut ev), 1); // T1: reach waypoint 1
        assert!(at(&env, id, p[1]));

        // T2: path exhausted, first stall.
        assert_eq!(step(&mut e, &mut env, &mut ev), 0);
        let s = e.state(id).unwrap();
        assert_eq!(s.phase, Phase::Stalled { retries: 1 });
        assert_eq!(s.waypoint_index, 1);

        // T3: second consecutive stall recovers with a corrective hop.
        assert_eq!(step(&mut e, &mut env, &mut ev), 1);
        let s = e.state(id).unwrap();
        assert_eq!(s.phase, Phase::Advancing);
        assert_eq!(s.phase.retries(), 0);
        assert_eq!(s.waypoint_index, 2);
        assert_eq!(env.mote(id).unwrap().path(), &[p[0], p[1], p[2]]);
        assert!(at(&env, id, p[2]));
        assert_eq!(ev.total_cost_path(id), length(&env, 0, 1) + length(&env, 1, 2));
    }

    #[test]
    fn repeated_recovery_reaches_destination() {
        let p = pts();
        let mut env = partial_path_env();
        let mut e  = engine(&env);
        let mut ev = ledger();

        for _ in 0..10 {
            step(&mut e, &mut env, &mut ev);
        }
        assert!(env.all_motes_arrived());
        assert!(at(&env, MoteId(0), p[3]));
        assert_eq!(env.mote(MoteId(0)).unwrap().path().len(), 4);
        let expected = length(&env, 0, 1) + length(&env, 1, 2) + length(&env, 2, 3);
        assert!((ev.total_cost_path(MoteId(0)) - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_hop_is_surfaced_and_state_kept() {
        let mut env = partial_path_env();
        let no_route = |_: &Environment, _: MoteId| -> MobilityResult<Vec<GeoPoint>> { Ok(Vec::new()) };
        let mut e = ProgressionEngine::new(no_route);
        e.setup(&env);
        let mut ev = ledger();

        for _ in 0..3 {
            step(&mut e, &mut env, &mut ev); // T0..T2: move, then first stall
        }
        let err = e.step_motes(&mut env, &mut ev).unwrap_err();
        assert!(matches!(err, MobilityError::NoRecoveryHop(MoteId(0))));

        let s = e.state(MoteId(0)).unwrap();
        assert_eq!(s.phase, Phase::Stalled { retries: 1 });
        assert_eq!(s.last_move, Tick(2));
        assert_eq!(env.mote(MoteId(0)).unwrap().path().len(), 2);
    }

    #[test]
    fn failed_cost_lookup_leaves_mote_untouched() {
        let p = pts();
        // 0 → 2 is not a direct connection.
        let mut env = env_with(vec![Mote::new(1, MoteKind::User, vec![p[0], p[2]])]);
        let mut e  = engine(&env);
        let mut ev = ledger();

        step(&mut e, &mut env, &mut ev);
        let err = e.step_motes(&mut env, &mut ev).unwrap_err();
        assert!(matches!(err, MobilityError::Route(ms_route::RouteError::NoConnection { .. })));

        let s = e.state(MoteId(0)).unwrap();
        assert_eq!(s, &ProgressState::start(Tick(0)));
        assert!(at(&env, MoteId(0), p[0]));
        assert_eq!(ev.total_cost_path(MoteId(0)), 0.0);
    }
}
