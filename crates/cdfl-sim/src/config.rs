//! Run configuration loaded from TOML.
//!
//! ```toml
//! exchange = "cache"
//! conflict = "last_write_wins"
//! type_blocks = [
//!     { agent_type = 1, count = 34 },
//!     { agent_type = 2, count = 33 },
//!     { agent_type = 3, count = 33 },
//! ]
//!
//! [sim]
//! seed = 7
//! num_agents = 100
//! num_rounds = 100
//! epoch_time = 60
//! area_restricted = true
//!
//! [cache]
//! capacity = 3
//! kick_out_window = 3
//! policy = { kind = "type_quota", quotas = [{ agent_type = 1, quota = 2 }] }
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use cdfl_cache::CacheConfig;
use cdfl_contact::ConflictPolicy;
use cdfl_core::{AgentType, SimConfig};

use crate::{SimError, SimResult};

/// How agents use their contacts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeMode {
    /// Every contact feeds the bounded caches; aggregation averages the cache.
    #[default]
    Cache,
    /// No caches: each agent averages with the last peer it met in the round.
    Direct,
}

/// `count` consecutive agents of type `agent_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeBlock {
    pub agent_type: AgentType,
    pub count:      usize,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub exchange:    ExchangeMode,
    pub conflict:    ConflictPolicy,

    /// Agent types in id order.  Agents not covered are type 0.
    pub type_blocks: Vec<TypeBlock>,

    pub sim:         SimConfig,
    pub cache:       CacheConfig,
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> SimResult<Self> {
        let cfg: RunConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> SimResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;

        let typed: usize = self.type_blocks.iter().map(|b| b.count).sum();
        if typed > self.sim.num_agents {
            return Err(SimError::Config(format!(
                "type_blocks cover {typed} agents but num_agents is {}",
                self.sim.num_agents
            )));
        }
        if self.sim.area_restricted {
            if let Some(b) = self.type_blocks.iter().find(|b| b.agent_type.0 > self.sim.num_areas) {
                return Err(SimError::Config(format!(
                    "agent type {} has no area (num_areas = {})",
                    b.agent_type, self.sim.num_areas
                )));
            }
        }
        Ok(())
    }

    /// Per-agent types expanded from `type_blocks`.
    pub fn agent_types(&self) -> Vec<AgentType> {
        let mut types: Vec<AgentType> = self
            .type_blocks
            .iter()
            .flat_map(|b| std::iter::repeat_n(b.agent_type, b.count))
            .take(self.sim.num_agents)
            .collect();
        types.resize(self.sim.num_agents, AgentType::UNRESTRICTED);
        types
    }
}
