//! `ms-route` — route cost bookkeeping and route comparison.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`heuristic`] | `RoutingHeuristic` trait, `DistanceHeuristic`, `GraphHeuristic` |
//! | [`cost`]      | `CostModel` trait, `LengthCost`, `WeightedCost`                 |
//! | [`evaluator`] | `RouteEvaluator<C>` cost ledger, `CostCharge`, `InformationTable` |
//! | [`analyser`]  | `RouteAnalyser<H>`, `RouteCandidate`, `IMPROVEMENT_THRESHOLD`   |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                                  |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                |
//! |-----------|-------------------------------------------------------|
//! | `fx-hash` | FxHash maps for the cost ledger (integer keys).       |

pub mod analyser;
pub mod cost;
pub mod error;
pub mod evaluator;
pub mod heuristic;

#[cfg(test)]
mod tests;

pub use analyser::{IMPROVEMENT_THRESHOLD, RouteAnalyser, RouteCandidate};
pub use cost::{CostModel, LengthCost, WeightedCost};
pub use error::{RouteError, RouteResult};
pub use evaluator::{CostCharge, InformationTable, RouteEvaluator};
pub use heuristic::{DistanceHeuristic, GraphHeuristic, RoutingHeuristic};
