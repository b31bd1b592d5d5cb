use ms_core::WaypointId;
use ms_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no connection from {from} to {to}")]
    NoConnection { from: WaypointId, to: WaypointId },

    #[error("path index {index} out of range for path of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("spatial lookup failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type RouteResult<T> = Result<T, RouteError>;
