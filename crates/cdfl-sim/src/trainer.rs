//! The local-training seam.

use cdfl_cache::Artifact;
use cdfl_core::{AgentId, Round};

/// Produces each agent's artifact for a round from its current one.
///
/// Implementations wrap the actual learning code; the simulator only moves
/// and averages the resulting parameter vectors.  Called once per agent per
/// round, in ascending `AgentId` order.
pub trait Trainer {
    fn train(&mut self, agent: AgentId, round: Round, current: &Artifact) -> Artifact;
}

/// A [`Trainer`] that returns the current artifact unchanged.  Useful when
/// only the exchange dynamics matter.
pub struct IdentityTrainer;

impl Trainer for IdentityTrainer {
    fn train(&mut self, _agent: AgentId, _round: Round, current: &Artifact) -> Artifact {
        current.clone()
    }
}

impl<F> Trainer for F
where
    F: FnMut(AgentId, Round, &Artifact) -> Artifact,
{
    fn train(&mut self, agent: AgentId, round: Round, current: &Artifact) -> Artifact {
        self(agent, round, current)
    }
}
