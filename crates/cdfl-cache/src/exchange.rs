//! Cache updates triggered by one contact.

use tracing::debug;

use cdfl_core::{AgentId, AgentType, Round};

use crate::{Admission, Artifact, CacheEntry, CacheTable, EvictionPolicy};

/// Read-only view of every agent's current artifact and type, taken before
/// any cache of the round is updated.
#[derive(Copy, Clone, Debug)]
pub struct PeerSnapshot<'a> {
    pub artifacts: &'a [Artifact],
    pub types:     &'a [AgentType],
}

impl PeerSnapshot<'_> {
    fn entry_for(&self, peer: AgentId, round: Round) -> CacheEntry {
        CacheEntry::new(self.artifacts[peer.index()].clone(), round, self.types[peer.index()])
    }
}

/// Both tables of a contact, borrowed mutably at once.
fn pair_mut(tables: &mut [CacheTable], a: usize, b: usize) -> (&mut CacheTable, &mut CacheTable) {
    if a < b {
        let (lo, hi) = tables.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = tables.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Record the contact `a <-> b` in both caches: each side stores a snapshot
/// of the other's artifact stamped with `round`.
///
/// Returns the admission outcome for `a`'s table, then `b`'s.  A self-contact
/// is rejected on both sides.
pub fn on_contact<P: EvictionPolicy + ?Sized>(
    tables:   &mut [CacheTable],
    a:        AgentId,
    b:        AgentId,
    snapshot: &PeerSnapshot<'_>,
    round:    Round,
    policy:   &P,
) -> (Admission, Admission) {
    if a == b {
        return (Admission::Rejected, Admission::Rejected);
    }
    let (ta, tb) = pair_mut(tables, a.index(), b.index());
    let got_a = policy.admit(ta, b, snapshot.entry_for(b, round), round);
    let got_b = policy.admit(tb, a, snapshot.entry_for(a, round), round);

    for (owner, outcome) in [(a, &got_a), (b, &got_b)] {
        if let Admission::Inserted { evicted } = outcome {
            if !evicted.is_empty() {
                debug!(owner = owner.0, ?evicted, policy = policy.name(), "cache eviction");
            }
        }
    }
    (got_a, got_b)
}
