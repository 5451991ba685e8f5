use cdfl_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),

    #[error("epoch_time must be > 0")]
    ZeroEpoch,

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type ContactResult<T> = Result<T, ContactError>;
