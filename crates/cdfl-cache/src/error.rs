use cdfl_core::AgentId;
use thiserror::Error;

/// Failures while averaging artifacts.  Any of these aborts the run.
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("artifact from {peer} has {got} parameters, {owner} expects {expected}")]
    ShapeMismatch {
        owner:    AgentId,
        peer:     AgentId,
        expected: usize,
        got:      usize,
    },

    #[error("no aggregation weight for {0}")]
    MissingWeight(AgentId),

    #[error("aggregation weights for {0} sum to zero")]
    ZeroWeight(AgentId),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("label counts have inconsistent class count: agent {agent} has {got}, expected {expected}")]
    LabelShape { agent: usize, expected: usize, got: usize },

    #[error("the distribution policy needs per-agent label counts")]
    MissingLabels,

    #[error("decay must lie in (0, 1], got {0}")]
    InvalidDecay(f64),
}

pub type CacheResult<T> = Result<T, CacheError>;
