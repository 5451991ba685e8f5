//! Cache settings, deserialised from the `[cache]` table of a run config.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use cdfl_core::AgentType;

use crate::policy::QuotaTable;
use crate::{CachePolicy, CacheError, CacheResult, DistributionPolicy, LabelStats, PlainPolicy, TypeQuotaPolicy};

fn default_capacity() -> usize { 3 }
fn default_kick_out_window() -> i64 { 3 }
fn default_true() -> bool { true }
fn default_decay() -> f64 { 0.9 }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum entries per agent.  0 disables caching.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entries older than this many rounds are dropped at the start of each
    /// round.  0 or negative disables timeout eviction.
    #[serde(default = "default_kick_out_window")]
    pub kick_out_window: i64,

    /// Weight artifacts by training-sample count; otherwise uniformly.
    #[serde(default = "default_true")]
    pub weighted_aggregation: bool,

    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity:             default_capacity(),
            kick_out_window:      default_kick_out_window(),
            weighted_aggregation: true,
            policy:               PolicyConfig::default(),
        }
    }
}

/// One `{ agent_type, quota }` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeQuota {
    pub agent_type: AgentType,
    pub quota:      usize,
}

/// Quotas that apply only to tables owned by agents of `owner_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnerQuotas {
    pub owner_type: AgentType,
    pub quotas:     Vec<TypeQuota>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    #[default]
    Plain,
    TypeQuota {
        #[serde(default)]
        quotas:       Vec<TypeQuota>,
        #[serde(default)]
        owner_quotas: Vec<OwnerQuotas>,
    },
    Distribution {
        #[serde(default = "default_decay")]
        decay: f64,
    },
}

fn quota_table(rows: &[TypeQuota]) -> QuotaTable {
    rows.iter().map(|q| (q.agent_type, q.quota)).collect()
}

impl PolicyConfig {
    /// Instantiate the policy.  The distribution policy needs `labels`.
    pub fn build(&self, labels: Option<Arc<LabelStats>>) -> CacheResult<CachePolicy> {
        Ok(match self {
            PolicyConfig::Plain => CachePolicy::Plain(PlainPolicy),
            PolicyConfig::TypeQuota { quotas, owner_quotas } => {
                let policy = owner_quotas.iter().fold(
                    TypeQuotaPolicy::new(quota_table(quotas)),
                    |p, o| p.with_owner_quotas(o.owner_type, quota_table(&o.quotas)),
                );
                CachePolicy::TypeQuota(policy)
            }
            PolicyConfig::Distribution { decay } => {
                let labels = labels.ok_or(CacheError::MissingLabels)?;
                CachePolicy::Distribution(DistributionPolicy::new(labels, *decay)?)
            }
        })
    }

    /// Whether the policy needs per-agent label counts.
    pub fn needs_labels(&self) -> bool {
        matches!(self, PolicyConfig::Distribution { .. })
    }
}
