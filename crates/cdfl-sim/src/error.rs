use cdfl_cache::{AggregateError, CacheError};
use cdfl_contact::ContactError;
use cdfl_core::CoreError;
use cdfl_mobility::MobilityError;
use cdfl_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("road network error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("contact error: {0}")]
    Contact(#[from] ContactError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("failed to parse run config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialise run config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
