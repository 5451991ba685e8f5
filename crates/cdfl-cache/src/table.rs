//! Per-agent cache tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use cdfl_core::{AgentId, AgentType, Round};

use crate::Artifact;

/// One cached peer artifact.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub artifact:     Artifact,

    /// Round in which the contact that produced this entry happened.
    pub round_stamp:  Round,

    pub peer_type:    AgentType,

    /// Peer's per-class label counts, when known.
    pub distribution: Option<Arc<[f64]>>,

    /// Diversity score in `[0, 1]`, set by the distribution policy.
    pub cache_score:  f64,
}

impl CacheEntry {
    pub fn new(artifact: Artifact, round_stamp: Round, peer_type: AgentType) -> Self {
        Self { artifact, round_stamp, peer_type, distribution: None, cache_score: 0.0 }
    }
}

/// The bounded cache owned by one agent, keyed by peer id.
///
/// Entries live in a `BTreeMap` so iteration (and therefore aggregation
/// order and tie-breaking) is deterministic.  `len() <= capacity` always
/// holds; the owner never appears as a key.
#[derive(Clone, Debug)]
pub struct CacheTable {
    pub owner:      AgentId,
    pub owner_type: AgentType,
    pub capacity:   usize,
    entries:        BTreeMap<AgentId, CacheEntry>,
}

impl CacheTable {
    pub fn new(owner: AgentId, owner_type: AgentType, capacity: usize) -> Self {
        Self { owner, owner_type, capacity, entries: BTreeMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn get(&self, peer: AgentId) -> Option<&CacheEntry> {
        self.entries.get(&peer)
    }

    pub fn contains(&self, peer: AgentId) -> bool {
        self.entries.contains_key(&peer)
    }

    /// Entries in ascending peer-id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &CacheEntry)> {
        self.entries.iter().map(|(&id, e)| (id, e))
    }

    pub fn peers(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of cached entries whose peer has type `t`.
    pub fn count_type(&self, t: AgentType) -> usize {
        self.entries.values().filter(|e| e.peer_type == t).count()
    }

    /// Oldest entry accepted by `filter`: smallest `round_stamp`, ties to the
    /// lowest peer id.
    pub fn oldest_where(&self, filter: impl Fn(&CacheEntry) -> bool) -> Option<AgentId> {
        self.entries
            .iter()
            .filter(|(_, e)| filter(e))
            .min_by_key(|(id, e)| (e.round_stamp, **id))
            .map(|(&id, _)| id)
    }

    pub fn oldest(&self) -> Option<AgentId> {
        self.oldest_where(|_| true)
    }

    pub fn remove(&mut self, peer: AgentId) -> Option<CacheEntry> {
        self.entries.remove(&peer)
    }

    /// Insert or overwrite without any capacity check.  Policies call this
    /// after making room.
    pub(crate) fn put(&mut self, peer: AgentId, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(peer, entry)
    }

    /// Drop every entry older than `window` rounds: those with
    /// `round_stamp < round - window`.  A non-positive window disables
    /// timeout eviction.  Returns the removed peer ids.
    pub fn kick_out(&mut self, round: Round, window: i64) -> Vec<AgentId> {
        if window <= 0 {
            return Vec::new();
        }
        let cutoff = round.0 as i64 - window;
        let stale: Vec<AgentId> = self
            .entries
            .iter()
            .filter(|(_, e)| (e.round_stamp.0 as i64) < cutoff)
            .map(|(&id, _)| id)
            .collect();
        for id in &stale {
            self.entries.remove(id);
        }
        stale
    }

    /// Mean `round - round_stamp` over all entries; `None` when empty.
    pub fn mean_age(&self, round: Round) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: u64 = self.entries.values().map(|e| round.age_of(e.round_stamp) as u64).sum();
        Some(total as f64 / self.entries.len() as f64)
    }
}
