//! Plain data row types written by output backends.

use cdfl_cache::{AgentCacheStats, CacheDiagnostics};

/// Cache statistics over all agents at the end of one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheSummaryRow {
    pub round:         u32,
    pub mean_age:      f64,
    pub mean_entries:  f64,
    pub total_entries: u64,
}

/// One agent's cache statistics at the end of one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentCacheRow {
    pub round:    u32,
    pub agent_id: u32,
    pub entries:  u32,
    pub mean_age: f64,
    /// Tables holding this agent's artifact, counting its own.
    pub coverage: u32,
}

impl From<&CacheDiagnostics> for CacheSummaryRow {
    fn from(d: &CacheDiagnostics) -> Self {
        Self {
            round:         d.round.0,
            mean_age:      d.mean_age,
            mean_entries:  d.mean_entries,
            total_entries: d.total_entries as u64,
        }
    }
}

impl AgentCacheRow {
    pub fn from_stats(round: u32, s: &AgentCacheStats) -> Self {
        Self {
            round,
            agent_id: s.agent.0,
            entries:  s.entries as u32,
            mean_age: s.mean_age,
            coverage: s.coverage as u32,
        }
    }
}
