//! `ms-spatial` — navigation graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `WaypointGraph` (CSR + R-tree), `WaypointGraphBuilder`      |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! The engine never builds graphs from geography itself; applications hand
//! it a finished [`WaypointGraph`].  The router exists so that a mote whose
//! path ran out can be given a corrective next hop.

pub mod error;
pub mod graph;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use graph::{WaypointGraph, WaypointGraphBuilder};
pub use router::{DijkstraRouter, Route, Router};
