//! Weighted averaging of artifacts.
//!
//! Sums are accumulated in `f64` and rounded back to `f32` once.

use cdfl_core::AgentId;

use crate::{AggregateError, Artifact, CacheTable};

/// Weighted mean of `(peer, artifact, weight)` terms, checked against the
/// shape of the owner's artifact.
fn weighted_mean<'a>(
    owner:    AgentId,
    expected: usize,
    terms:    impl Iterator<Item = (AgentId, &'a Artifact, f64)>,
) -> Result<Artifact, AggregateError> {
    let mut acc = vec![0.0f64; expected];
    let mut total = 0.0f64;
    for (peer, artifact, w) in terms {
        if artifact.len() != expected {
            return Err(AggregateError::ShapeMismatch { owner, peer, expected, got: artifact.len() });
        }
        for (slot, &x) in acc.iter_mut().zip(artifact.as_slice()) {
            *slot += w * x as f64;
        }
        total += w;
    }
    if total <= 0.0 {
        return Err(AggregateError::ZeroWeight(owner));
    }
    Ok(Artifact::new(acc.into_iter().map(|s| (s / total) as f32).collect()))
}

/// Aggregate the owner's artifact with every artifact in its cache.
///
/// `weights[i]` is agent `i`'s aggregation weight.  An empty table returns
/// `own` unchanged.  Neither `own` nor the cached artifacts are modified.
pub fn combine(
    own:        &Artifact,
    own_weight: f64,
    table:      &CacheTable,
    weights:    &[f64],
) -> Result<Artifact, AggregateError> {
    if table.is_empty() {
        return Ok(own.clone());
    }
    let owner = table.owner;
    let cached = table
        .iter()
        .map(|(peer, e)| {
            weights
                .get(peer.index())
                .map(|&w| (peer, &e.artifact, w))
                .ok_or(AggregateError::MissingWeight(peer))
        })
        .collect::<Result<Vec<_>, _>>()?;

    weighted_mean(
        owner,
        own.len(),
        std::iter::once((owner, own, own_weight)).chain(cached),
    )
}

/// Weighted mean of two artifacts (direct exchange without a cache).
pub fn average_pair(
    owner:       AgentId,
    own:         &Artifact,
    own_weight:  f64,
    peer:        AgentId,
    other:       &Artifact,
    peer_weight: f64,
) -> Result<Artifact, AggregateError> {
    weighted_mean(
        owner,
        own.len(),
        [(owner, own, own_weight), (peer, other, peer_weight)].into_iter(),
    )
}
