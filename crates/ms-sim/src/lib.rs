//! `ms-sim` — run orchestration for the mote_sim engine.
//!
//! # Tick operation
//!
//! ```text
//! Simulation::step(env):
//!   ① Progression — every enabled, not-yet-arrived mote is advanced by the
//!                   ProgressionEngine (ascending MoteId); user-mote
//!                   traversals are charged to the RouteEvaluator.
//!   ② Gathering   — while an information-gathering loop runs, snapshot all
//!                   connection costs once per snapshot interval.
//!   ③ Clock       — advance one tick; due transmission triggers fire.
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`sim`]        | `Simulation<A, C>`, `RunCondition`, `StepOutcome`              |
//! | [`adaptation`] | `FeedbackLoop` trait, `Strategy`, `AdaptationManager`          |
//! | [`profile`]    | `InputProfile` — activation probabilities, run duration        |
//! | [`report`]     | `RunReport`, `MoteCost`                                        |
//! | [`observer`]   | `SimObserver` hooks, `NoopObserver`                            |
//! | [`builder`]    | `SimBuilder`                                                   |
//! | [`error`]      | `SimError`, `SimResult<T>`                                     |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Rayon eligibility scan in the progression engine.           |
//! | `fx-hash`  | FxHash maps in the cost ledger.                             |
//! | `serde`    | Serde derives on `InputProfile`, `RunReport`, `SimConfig`.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ms_core::SimConfig;
//! use ms_mobility::GraphRoutingApplication;
//! use ms_sim::{NoopObserver, SimBuilder};
//! use ms_spatial::DijkstraRouter;
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), GraphRoutingApplication::new(DijkstraRouter))
//!     .build()?;
//! sim.setup_single_run(&mut env, true)?;
//! let report = sim.run(&mut env, &mut NoopObserver)?;
//! ```

pub mod adaptation;
pub mod builder;
pub mod error;
pub mod observer;
pub mod profile;
pub mod report;
pub mod sim;


pub use adaptation::{AdaptationManager, FeedbackLoop, InformationGatheringLoop, Strategy};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use profile::InputProfile;
pub use report::{MoteCost, RunReport};
pub use sim::{RunCondition, Simulation, StepOutcome};
