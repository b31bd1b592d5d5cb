use ms_core::MoteId;
use ms_fleet::FleetError;
use ms_route::RouteError;
use ms_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("no progression state for mote {0}; was the run set up?")]
    MissingState(MoteId),

    #[error("mote {0} exhausted its path and no corrective hop is available")]
    NoRecoveryHop(MoteId),

    #[error("cost lookup failed: {0}")]
    Route(#[from] RouteError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error("routing failed: {0}")]
    Spatial(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
