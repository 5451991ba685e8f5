use cdfl_core::{AgentId, AreaId, NodeId};
use cdfl_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("{agent} reached {node}, which has no outgoing road")]
    DeadEnd { agent: AgentId, node: NodeId },

    #[error("area {0} has no node an agent could start from")]
    NoSpawnNode(AreaId),

    #[error("expected {expected} per-agent RNGs, got {got}")]
    RngCountMismatch { expected: usize, got: usize },

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
