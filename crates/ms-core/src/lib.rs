//! `ms-core` — foundational types for the `mote_sim` engine.
//!
//! This crate is a dependency of every other `ms-*` crate.  It intentionally
//! has no `ms-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `MoteId`, `GatewayId`, `WaypointId`, `ConnectionId`   |
//! | [`geo`]         | `GeoPoint`, `MapCoord`, `MapProjection`               |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`clock`]       | `Clock<E>` — tick clock with self-rescheduling triggers |
//! | [`rng`]         | `SimRng` (seeded, run-level)                          |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod clock;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::Clock;
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, MapCoord, MapProjection};
pub use ids::{ConnectionId, GatewayId, MoteId, WaypointId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
