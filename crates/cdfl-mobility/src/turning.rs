//! Next-destination choice at an intersection.

use cdfl_core::{AgentRng, NodeId, Point};
use cdfl_spatial::RoadNetwork;
use cdfl_spatial::network::Adjacency;

/// Cosine similarities closer than this to the maximum count as ties.
/// Intentionally looser than exact equality with the maximum: collinear
/// candidates can differ by a few ulps after normalisation.
const TIE_EPSILON: f64 = 1e-9;

/// Turn probabilities for candidates with the given heading similarities.
///
/// Candidates within [`TIE_EPSILON`] of the best similarity share 0.5
/// equally; the rest share the other 0.5 equally.  When every candidate
/// ties the distribution is uniform.
///
/// ```
/// use cdfl_mobility::turn_probabilities;
/// assert_eq!(turn_probabilities(&[1.0, 0.0, -1.0]), vec![0.5, 0.25, 0.25]);
/// ```
pub fn turn_probabilities(similarities: &[f64]) -> Vec<f64> {
    let n = similarities.len();
    if n <= 1 {
        return vec![1.0; n];
    }

    let best = similarities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let is_best = |s: f64| best - s <= TIE_EPSILON;
    let n_best = similarities.iter().filter(|&&s| is_best(s)).count();
    if n_best == n {
        return vec![1.0 / n as f64; n];
    }

    let p_best = 0.5 / n_best as f64;
    let p_rest = 0.5 / (n - n_best) as f64;
    similarities
        .iter()
        .map(|&s| if is_best(s) { p_best } else { p_rest })
        .collect()
}

/// Pick the node to head for after arriving at `node`.
///
/// `excluded` (the node just left) is removed from the candidates unless it
/// is the only neighbor, in which case the car makes a forced U-turn.
/// Returns `None` only if `node` has no neighbors in `view`.
pub fn choose_next_destination(
    net:      &RoadNetwork,
    view:     &Adjacency,
    node:     NodeId,
    excluded: NodeId,
    heading:  Point,
    rng:      &mut AgentRng,
) -> Option<NodeId> {
    let all = view.neighbors(node);
    let forward: Vec<NodeId> = all.iter().copied().filter(|&c| c != excluded).collect();
    let candidates: &[NodeId] = if forward.is_empty() { all } else { &forward };

    match candidates {
        []       => None,
        [single] => Some(*single),
        _ => {
            let here = net.pos(node);
            let similarities: Vec<f64> = candidates
                .iter()
                .map(|&c| heading.cosine(net.pos(c) - here))
                .collect();
            let probs = turn_probabilities(&similarities);
            let i = rng.choose_weighted(&probs).unwrap_or(0);
            Some(candidates[i])
        }
    }
}
