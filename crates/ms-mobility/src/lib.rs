//! `ms-mobility` — per-mote progression along precomputed paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `ProgressState`, `Phase` — per-mote progression record          |
//! | [`store`]   | `ProgressStore` — `Vec<ProgressState>` indexed by `MoteId`      |
//! | [`routing`] | `RoutingApplication` trait, `GraphRoutingApplication<R>`        |
//! | [`engine`]  | `ProgressionEngine<A>` — per-tick decide / quote / apply        |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                            |
//!
//! # Progression model
//!
//! A mote moves at most one waypoint per eligible tick.  Eligibility is
//! gated by the mote's speed (`1000 / speed` ms between moves) and its start
//! offset.  User motes whose path runs out before their destination stall
//! once, then ask the [`RoutingApplication`] for a corrective next hop:
//!
//! ```text
//! Advancing ──(path exhausted)──▶ Stalled { retries: 1 }
//!     ▲                                │ (exhausted again)
//!     └────── append hop, move ◀───────┘
//! ```
//!
//! Every traversal by a user mote is charged to the
//! [`RouteEvaluator`][ms_route::RouteEvaluator].

pub mod engine;
pub mod error;
pub mod routing;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::ProgressionEngine;
pub use error::{MobilityError, MobilityResult};
pub use routing::{GraphRoutingApplication, RoutingApplication};
pub use state::{Phase, ProgressState};
pub use store::ProgressStore;
