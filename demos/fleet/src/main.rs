//! fleet — small end-to-end run of the mote_sim engine.
//!
//! Three motes on a 6-waypoint graph around the Leuven campus:
//!
//! - mote 1 (user) has a partial path and a destination beyond it, so it
//!   stalls and is extended with corrective hops;
//! - mote 2 (user) takes the polluted detour and is compared against the
//!   cheapest route afterwards;
//! - mote 3 (sensor) wanders backwards and transmits every 5 s.
//!
//! Set `RUST_LOG=debug` to see stalls, recoveries and snapshots.

mod network;

use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ms_core::{GeoPoint, MapProjection, MoteId, SimConfig, Tick};
use ms_fleet::{Environment, load_fleet_reader};
use ms_mobility::GraphRoutingApplication;
use ms_route::{GraphHeuristic, InformationTable, RouteAnalyser, RouteCandidate, WeightedCost};
use ms_sim::{InformationGatheringLoop, RunCondition, RunReport, SimBuilder, SimObserver};
use ms_spatial::{DijkstraRouter, Router};

use network::build_graph;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:             u64 = 42;
const TICK_DURATION_MS: u32 = 1_000; // 1 tick = 1 s
const GATHER_INTERVAL:  u64 = 5;
const GATHER_INTERVALS: u64 = 4;

// ── Fleet CSV ─────────────────────────────────────────────────────────────────

const FLEET_CSV: &str = "\
eui,kind,speed,movement_offset_secs,sending_offset_secs,sending_period_secs,point,lat,lon\n\
1,user,1.0,0,0,0,path,50.8700,4.7000\n\
1,user,1.0,0,0,0,path,50.8710,4.7000\n\
1,user,1.0,0,0,0,destination,50.8730,4.7000\n\
2,user,1.0,3,0,0,path,50.8700,4.7000\n\
2,user,1.0,3,0,0,path,50.8710,4.7000\n\
2,user,1.0,3,0,0,path,50.8710,4.7015\n\
2,user,1.0,3,0,0,path,50.8720,4.7015\n\
2,user,1.0,3,0,0,path,50.8720,4.7000\n\
3,sensor,0.5,0,2,5,path,50.8730,4.7000\n\
3,sensor,0.5,0,2,5,path,50.8720,4.7000\n\
3,sensor,0.5,0,2,5,path,50.8710,4.7000\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Progress {
    moves:     usize,
    snapshots: usize,
}

impl SimObserver for Progress {
    fn on_tick_end(&mut self, _tick: Tick, moved: usize) {
        self.moves += moved;
    }

    fn on_snapshot(&mut self, _tick: Tick, _information: &InformationTable) {
        self.snapshots += 1;
    }

    fn on_run_end(&mut self, report: &RunReport) {
        print!("{report}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== fleet — mote_sim demo ===");

    // 1. World.
    let (graph, _) = build_graph();
    println!(
        "Graph: {} waypoints, {} connections",
        graph.waypoint_count(),
        graph.connection_count()
    );
    let config = SimConfig {
        seed:             SEED,
        tick_duration_ms: TICK_DURATION_MS,
        ..SimConfig::default()
    };
    let projection = MapProjection::new(GeoPoint::new(50.8700, 4.7000), 1.0)?;
    let mut env = Environment::new(graph, projection, config.make_clock());
    env.add_gateway(GeoPoint::new(50.8715, 4.7005));

    for mote in load_fleet_reader(Cursor::new(FLEET_CSV))? {
        env.add_mote(mote);
    }
    println!("Fleet: {} motes", env.motes().len());
    println!();

    // 2. Single run until every mote has arrived.
    let mut sim = SimBuilder::new(config.clone(), GraphRoutingApplication::new(DijkstraRouter))
        .cost_model(WeightedCost)
        .build()?;
    sim.setup_single_run(&mut env, true)?;

    let mut progress = Progress::default();
    let t0 = Instant::now();
    let report = sim.run(&mut env, &mut progress)?;
    println!(
        "Single run: {} moves in {} ticks ({:.3} ms)",
        progress.moves,
        report.finished_at.0,
        t0.elapsed().as_secs_f64() * 1_000.0
    );
    println!("Uplinks received: {}", env.gateways()[0].received());
    println!();

    // 3. Was mote 2's detour worth it?
    let detour = MoteId(1);
    let taken = RouteCandidate::new(
        report.get(detour).map_or(0.0, |m| m.total_cost),
        env.mote(detour)?.path().to_vec(),
    );
    let (start, end) = (env.graph.snap(taken.waypoints[0])?, env.graph.snap(GeoPoint::new(50.8720, 4.7000))?);
    let best = DijkstraRouter.route(&env.graph, start, end)?;
    let cheapest = RouteCandidate::new(best.total_cost, best.positions(&env.graph));

    let analyser = RouteAnalyser::new(GraphHeuristic::new(&env.graph));
    println!("Detour heuristic cost   : {:.1}", analyser.heuristic_cost(&taken.waypoints));
    println!("Cheapest heuristic cost : {:.1}", analyser.heuristic_cost(&cheapest.waypoints));
    println!("Keep detour over cheapest route? {}", analyser.is_better_path(&taken, &cheapest));
    println!("Detour changed enough?          {}", analyser.has_changed_enough(&taken));
    println!();

    // 4. Information gathering with a short budget.
    let gather_config = SimConfig {
        snapshot_interval_ticks: GATHER_INTERVAL,
        budget_intervals:        GATHER_INTERVALS,
        ..config
    };
    let mut gather = SimBuilder::new(gather_config, GraphRoutingApplication::new(DijkstraRouter))
        .cost_model(WeightedCost)
        .adaptation(Box::new(InformationGatheringLoop::new()))
        .build()?;
    gather.setup_run(&mut env, RunCondition::Custom(Box::new(|_: &Environment| true)), true)?;

    let mut progress = Progress::default();
    gather.run(&mut env, &mut progress)?;
    println!("Information gathering: {} snapshots", progress.snapshots);
    println!("{:<16} {}", "Connection", "Samples");
    println!("{}", "-".repeat(48));
    for (conn, samples) in gather.information().iter() {
        let formatted: Vec<String> = samples.iter().map(|s| format!("{s:.0}")).collect();
        println!("{:<16} {}", conn.to_string(), formatted.join(" "));
    }

    Ok(())
}
