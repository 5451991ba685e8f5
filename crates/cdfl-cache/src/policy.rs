//! Eviction policies.
//!
//! All policies share one contract: [`EvictionPolicy::admit`] either stores
//! the entry (possibly evicting others to make room) or rejects it, and
//! afterwards the table's capacity (and any quota) still holds.
//!
//! A peer that is already cached is always refreshed in place; that never
//! counts as a capacity event.  A table with capacity 0 rejects everything.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use cdfl_core::{AgentId, AgentType, Round};

use crate::{CacheEntry, CacheError, CacheResult, CacheTable, LabelStats};

/// Outcome of offering one entry to a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// New peer stored; `evicted` lists the peers removed to make room.
    Inserted { evicted: Vec<AgentId> },
    /// Peer was already cached; its entry was overwritten.
    Refreshed,
    /// Entry not stored.
    Rejected,
}

/// Capacity management for a [`CacheTable`].
pub trait EvictionPolicy: Send + Sync {
    /// Offer `entry` from `peer` to `table` during `round`.
    fn admit(&self, table: &mut CacheTable, peer: AgentId, entry: CacheEntry, round: Round) -> Admission;

    fn name(&self) -> &'static str;
}

/// Shared front half of every policy: capacity 0, self, and refresh.
/// `Continue` hands the entry back when a real admission decision is needed.
fn admit_trivial(table: &mut CacheTable, peer: AgentId, entry: CacheEntry) -> ControlFlow<Admission, CacheEntry> {
    if table.capacity == 0 || peer == table.owner {
        return ControlFlow::Break(Admission::Rejected);
    }
    if table.contains(peer) {
        table.put(peer, entry);
        return ControlFlow::Break(Admission::Refreshed);
    }
    ControlFlow::Continue(entry)
}

// ── Plain ─────────────────────────────────────────────────────────────────────

/// Capacity only; the oldest entry makes room.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlainPolicy;

impl EvictionPolicy for PlainPolicy {
    fn admit(&self, table: &mut CacheTable, peer: AgentId, entry: CacheEntry, _round: Round) -> Admission {
        let entry = match admit_trivial(table, peer, entry) {
            ControlFlow::Break(done)     => return done,
            ControlFlow::Continue(entry) => entry,
        };
        let mut evicted = Vec::new();
        while table.is_full() {
            let Some(victim) = table.oldest() else { break };
            table.remove(victim);
            evicted.push(victim);
        }
        table.put(peer, entry);
        Admission::Inserted { evicted }
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

// ── Type quota ────────────────────────────────────────────────────────────────

/// Per-peer-type slot limits.  Types without an entry are bounded only by
/// capacity.
pub type QuotaTable = BTreeMap<AgentType, usize>;

/// Capacity plus a quota per peer type.  An owner type may carry its own
/// quota table (e.g. type-0 taxis limiting how many typed cars they keep);
/// otherwise `default` applies.
#[derive(Clone, Debug, Default)]
pub struct TypeQuotaPolicy {
    pub default:   QuotaTable,
    pub per_owner: BTreeMap<AgentType, QuotaTable>,
}

impl TypeQuotaPolicy {
    pub fn new(default: QuotaTable) -> Self {
        Self { default, per_owner: BTreeMap::new() }
    }

    pub fn with_owner_quotas(mut self, owner: AgentType, quotas: QuotaTable) -> Self {
        self.per_owner.insert(owner, quotas);
        self
    }

    pub fn quota(&self, owner: AgentType, peer: AgentType) -> Option<usize> {
        self.per_owner.get(&owner).unwrap_or(&self.default).get(&peer).copied()
    }
}

impl EvictionPolicy for TypeQuotaPolicy {
    fn admit(&self, table: &mut CacheTable, peer: AgentId, entry: CacheEntry, _round: Round) -> Admission {
        let entry = match admit_trivial(table, peer, entry) {
            ControlFlow::Break(done)     => return done,
            ControlFlow::Continue(entry) => entry,
        };
        let peer_type = entry.peer_type;
        let mut evicted = Vec::new();

        if let Some(quota) = self.quota(table.owner_type, peer_type) {
            if quota == 0 {
                return Admission::Rejected;
            }
            while table.count_type(peer_type) >= quota {
                let Some(victim) = table.oldest_where(|e| e.peer_type == peer_type) else { break };
                table.remove(victim);
                evicted.push(victim);
            }
        }
        while table.is_full() {
            let Some(victim) = table.oldest() else { break };
            table.remove(victim);
            evicted.push(victim);
        }
        table.put(peer, entry);
        Admission::Inserted { evicted }
    }

    fn name(&self) -> &'static str {
        "type_quota"
    }
}

// ── Distribution-aware ────────────────────────────────────────────────────────

/// Keeps the peers whose training data differs most from the owner's,
/// discounted by age.
///
/// Effective score = `cache_score * decay^(round - round_stamp)`.  When the
/// table is full the lowest effective score among the cached entries and the
/// incoming one is dropped; ties drop the older entry, then the lower id.
#[derive(Clone, Debug)]
pub struct DistributionPolicy {
    pub labels: Arc<LabelStats>,
    pub decay:  f64,
}

impl DistributionPolicy {
    pub fn new(labels: Arc<LabelStats>, decay: f64) -> CacheResult<Self> {
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(CacheError::InvalidDecay(decay));
        }
        Ok(Self { labels, decay })
    }

    pub fn effective_score(&self, entry: &CacheEntry, round: Round) -> f64 {
        entry.cache_score * self.decay.powi(round.age_of(entry.round_stamp) as i32)
    }
}

impl EvictionPolicy for DistributionPolicy {
    fn admit(&self, table: &mut CacheTable, peer: AgentId, mut entry: CacheEntry, round: Round) -> Admission {
        entry.cache_score = self.labels.score(table.owner, peer);
        if entry.distribution.is_none() {
            entry.distribution = self.labels.counts(peer).cloned();
        }
        let entry = match admit_trivial(table, peer, entry) {
            ControlFlow::Break(done)     => return done,
            ControlFlow::Continue(entry) => entry,
        };
        if !table.is_full() {
            table.put(peer, entry);
            return Admission::Inserted { evicted: Vec::new() };
        }

        let weakest = table
            .iter()
            .map(|(id, e)| (self.effective_score(e, round), e.round_stamp, id))
            .min_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));
        let incoming = self.effective_score(&entry, round);

        match weakest {
            // The newcomer is newest, so on an equal score the cached entry goes.
            Some((score, _, _)) if incoming < score => Admission::Rejected,
            Some((_, _, victim)) => {
                table.remove(victim);
                table.put(peer, entry);
                Admission::Inserted { evicted: vec![victim] }
            }
            None => Admission::Rejected,
        }
    }

    fn name(&self) -> &'static str {
        "distribution"
    }
}

// ── CachePolicy ───────────────────────────────────────────────────────────────

/// Runtime-selected policy, built from [`crate::PolicyConfig`].
#[derive(Clone, Debug)]
pub enum CachePolicy {
    Plain(PlainPolicy),
    TypeQuota(TypeQuotaPolicy),
    Distribution(DistributionPolicy),
}

impl EvictionPolicy for CachePolicy {
    fn admit(&self, table: &mut CacheTable, peer: AgentId, entry: CacheEntry, round: Round) -> Admission {
        match self {
            CachePolicy::Plain(p)        => p.admit(table, peer, entry, round),
            CachePolicy::TypeQuota(p)    => p.admit(table, peer, entry, round),
            CachePolicy::Distribution(p) => p.admit(table, peer, entry, round),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CachePolicy::Plain(p)        => p.name(),
            CachePolicy::TypeQuota(p)    => p.name(),
            CachePolicy::Distribution(p) => p.name(),
        }
    }
}

impl<P: EvictionPolicy + ?Sized> EvictionPolicy for Box<P> {
    fn admit(&self, table: &mut CacheTable, peer: AgentId, entry: CacheEntry, round: Round) -> Admission {
        (**self).admit(table, peer, entry, round)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
