//! Per-agent label distributions and the diversity score built on them.

use std::sync::Arc;

use cdfl_core::AgentId;

use crate::{CacheError, CacheResult};

/// Label counts of every agent's local training data, plus each agent's
/// largest diversity toward any other agent (used to normalise scores).
#[derive(Clone, Debug)]
pub struct LabelStats {
    counts:        Vec<Arc<[f64]>>,
    max_diversity: Vec<f64>,
}

impl LabelStats {
    /// `counts[i]` holds agent `i`'s per-class sample counts.  Every row must
    /// have the same length.
    pub fn new(counts: Vec<Vec<f64>>) -> CacheResult<Self> {
        let classes = counts.first().map_or(0, Vec::len);
        if let Some((agent, row)) = counts.iter().enumerate().find(|(_, r)| r.len() != classes) {
            return Err(CacheError::LabelShape { agent, expected: classes, got: row.len() });
        }
        let counts: Vec<Arc<[f64]>> = counts.into_iter().map(Into::into).collect();

        let n = counts.len();
        let max_diversity = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| diversity(&counts[i], &counts[j]))
                    .fold(0.0, f64::max)
            })
            .collect();
        Ok(Self { counts, max_diversity })
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self, agent: AgentId) -> Option<&Arc<[f64]>> {
        self.counts.get(agent.index())
    }

    /// Diversity of `peer`'s data relative to `owner`'s, normalised by the
    /// owner's maximum so it lies in `[0, 1]`.  Zero when the owner's maximum
    /// is zero or either agent is unknown.
    pub fn score(&self, owner: AgentId, peer: AgentId) -> f64 {
        let (Some(own), Some(other)) = (self.counts.get(owner.index()), self.counts.get(peer.index()))
        else {
            return 0.0;
        };
        let max = self.max_diversity[owner.index()];
        if max > 0.0 { diversity(own, other) / max } else { 0.0 }
    }
}

/// Population variance of the element-wise difference of two count vectors.
pub fn diversity(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let diffs = a.iter().zip(b).map(|(x, y)| x - y);
    let mean = diffs.clone().sum::<f64>() / n as f64;
    diffs.map(|d| (d - mean) * (d - mean)).sum::<f64>() / n as f64
}
