//! Spatial-subsystem error type.

use thiserror::Error;

use ms_core::{GeoPoint, WaypointId};

/// Errors produced by `ms-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: WaypointId, to: WaypointId },

    #[error("waypoint {0} not found in graph")]
    WaypointNotFound(WaypointId),

    #[error("graph has no waypoint near {0}")]
    EmptyGraph(GeoPoint),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
