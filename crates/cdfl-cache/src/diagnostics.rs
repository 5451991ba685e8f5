//! Cache statistics collected at the end of a round.

use cdfl_core::{AgentId, Round};

use crate::CacheTable;

#[derive(Clone, Debug, PartialEq)]
pub struct AgentCacheStats {
    pub agent:    AgentId,
    pub entries:  usize,
    /// Mean entry age in rounds; 0 for an empty table.
    pub mean_age: f64,
    /// How many tables hold this agent's artifact, counting its own model.
    pub coverage: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CacheDiagnostics {
    pub round:         Round,
    pub per_agent:     Vec<AgentCacheStats>,
    pub total_entries: usize,
    /// Mean age over every live entry of every table; 0 when all are empty.
    pub mean_age:      f64,
    /// Mean entries per agent.
    pub mean_entries:  f64,
}

impl CacheDiagnostics {
    pub fn collect(round: Round, tables: &[CacheTable]) -> Self {
        let mut coverage = vec![1usize; tables.len()];
        let mut age_sum = 0u64;
        for table in tables {
            for (peer, entry) in table.iter() {
                if let Some(c) = coverage.get_mut(peer.index()) {
                    *c += 1;
                }
                age_sum += round.age_of(entry.round_stamp) as u64;
            }
        }

        let per_agent: Vec<AgentCacheStats> = tables
            .iter()
            .map(|t| AgentCacheStats {
                agent:    t.owner,
                entries:  t.len(),
                mean_age: t.mean_age(round).unwrap_or(0.0),
                coverage: coverage.get(t.owner.index()).copied().unwrap_or(1),
            })
            .collect();

        let total_entries: usize = tables.iter().map(CacheTable::len).sum();
        let mean_age = if total_entries > 0 { age_sum as f64 / total_entries as f64 } else { 0.0 };
        let mean_entries = if tables.is_empty() { 0.0 } else { total_entries as f64 / tables.len() as f64 };

        Self { round, per_agent, total_entries, mean_age, mean_entries }
    }
}
