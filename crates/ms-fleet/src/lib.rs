//! `ms-fleet` — the motes, their gateways, and the environment they move in.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`mote`]        | `Mote`, `MoteKind`, `Packet`                               |
//! | [`gateway`]     | `Gateway`                                                  |
//! | [`environment`] | `Environment` — motes, gateways, graph, projection, clock |
//! | [`loader`]      | CSV fleet loading (`load_fleet_csv`, `load_fleet_reader`)  |
//! | [`error`]       | `FleetError`, `FleetResult<T>`                             |
//!
//! The environment is a plain owned value.  Engines borrow it for the
//! duration of one call (`&mut Environment`) instead of holding a long-lived
//! reference, so there is never a question of whether it is still alive.

pub mod environment;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod mote;


pub use environment::{EnvEvent, Environment};
pub use error::{FleetError, FleetResult};
pub use gateway::Gateway;
pub use loader::{load_fleet_csv, load_fleet_reader};
pub use mote::{Mote, MoteKind, Packet};
