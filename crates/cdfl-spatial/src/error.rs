//! Spatial-subsystem error type.

use thiserror::Error;

use cdfl_core::{AreaId, NodeId};

#[derive(Debug, Error)]
pub enum SpatialError {
    /// Every node must have at least one neighbor; an isolated node would
    /// strand any agent placed on it.
    #[error("node {0} has no neighbors")]
    IsolatedNode(NodeId),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("area {0} contains no road segment")]
    EmptyArea(AreaId),

    #[error("area {area} is not defined (network has {defined} areas)")]
    UnknownArea { area: AreaId, defined: usize },

    #[error("area partition covers {got} nodes, network has {expected}")]
    PartitionSize { expected: usize, got: usize },

    #[error("road network has no edges")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
