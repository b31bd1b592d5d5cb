use ms_core::{CoreError, MoteId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("mote {0} not found")]
    MoteNotFound(MoteId),

    #[error("fleet parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type FleetResult<T> = Result<T, FleetError>;
