//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use tracing::info;

use cdfl_cache::{Artifact, CacheTable, EvictionPolicy, LabelStats};
use cdfl_contact::{ContactScheduler, Eligibility};
use cdfl_core::{AgentId, AgentRngs, AgentType, AreaId, Round};
use cdfl_mobility::MobilityEngine;
use cdfl_spatial::{AreaPartition, RoadNetwork};

use crate::{RunConfig, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`RunConfig`] — mobility, contact, and cache parameters
/// - [`RoadNetwork`] — the road graph cars drive on
/// - initial artifacts — one per agent, all the same shape
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                   |
/// |---------------------|-------------------------------------------|
/// | `.weights(v)`       | 1.0 for every agent                       |
/// | `.label_counts(v)`  | none (required by the distribution policy) |
/// | `.agent_types(v)`   | expanded from `config.type_blocks`        |
/// | `.partition(p)`     | longitude bands when area restriction is on |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network, initial_artifacts)
///     .weights(sample_counts)
///     .build()?;
/// sim.run(&mut trainer, &mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:       RunConfig,
    network:      RoadNetwork,
    artifacts:    Vec<Artifact>,
    weights:      Option<Vec<f64>>,
    label_counts: Option<Vec<Vec<f64>>>,
    agent_types:  Option<Vec<AgentType>>,
    partition:    Option<AreaPartition>,
}

impl SimBuilder {
    pub fn new(config: RunConfig, network: RoadNetwork, artifacts: Vec<Artifact>) -> Self {
        Self {
            config,
            network,
            artifacts,
            weights:      None,
            label_counts: None,
            agent_types:  None,
            partition:    None,
        }
    }

    /// Per-agent aggregation weights (typically local sample counts).
    /// Ignored when `cache.weighted_aggregation` is off.
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Per-agent label counts for the distribution-aware policy.
    pub fn label_counts(mut self, counts: Vec<Vec<f64>>) -> Self {
        self.label_counts = Some(counts);
        self
    }

    /// Explicit per-agent types, overriding `config.type_blocks`.
    pub fn agent_types(mut self, types: Vec<AgentType>) -> Self {
        self.agent_types = Some(types);
        self
    }

    /// Explicit area partition, overriding the default longitude bands.
    pub fn partition(mut self, partition: AreaPartition) -> Self {
        self.partition = Some(partition);
        self
    }

    fn check_len(what: &'static str, expected: usize, got: usize) -> SimResult<()> {
        if expected != got {
            return Err(SimError::AgentCountMismatch { expected, got, what });
        }
        Ok(())
    }

    /// Validate inputs, place every car, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        let config = self.config;
        config.validate()?;
        let n = config.sim.num_agents;

        // ── Validate and resolve optional inputs ──────────────────────────
        Self::check_len("initial artifacts", n, self.artifacts.len())?;
        let shape = self.artifacts.first().map_or(0, Artifact::len);
        if let Some((i, a)) = self.artifacts.iter().enumerate().find(|(_, a)| a.len() != shape) {
            return Err(SimError::Config(format!(
                "initial artifact of agent {i} has {} parameters, expected {shape}",
                a.len()
            )));
        }

        let types = self.agent_types.unwrap_or_else(|| config.agent_types());
        Self::check_len("agent types", n, types.len())?;

        let weights = match (config.cache.weighted_aggregation, self.weights) {
            (true, Some(w)) => {
                Self::check_len("weights", n, w.len())?;
                w
            }
            _ => vec![1.0; n],
        };

        let labels = match self.label_counts {
            Some(counts) => {
                Self::check_len("label counts", n, counts.len())?;
                Some(Arc::new(LabelStats::new(counts)?))
            }
            None => None,
        };
        let policy = config.cache.policy.build(labels)?;

        // ── Areas ─────────────────────────────────────────────────────────
        let mut network = self.network;
        let areas: Vec<AreaId> = if config.sim.area_restricted {
            let partition = self
                .partition
                .unwrap_or_else(|| AreaPartition::longitude_bands(&network, config.sim.num_areas));
            network.apply_areas(&partition)?;
            if let Some(t) = types.iter().find(|t| t.0 as usize > network.area_count()) {
                return Err(SimError::Config(format!(
                    "agent type {t} has no area ({} defined)",
                    network.area_count()
                )));
            }
            types.iter().map(|t| t.home_area()).collect()
        } else {
            vec![AreaId::UNRESTRICTED; n]
        };
        let network = Arc::new(network);

        // ── Mobility + contacts ───────────────────────────────────────────
        let mut rngs = AgentRngs::new(n, config.sim.seed);
        let mut mobility = MobilityEngine::new(network.clone());
        let placement: Vec<(AgentType, AreaId)> = types.iter().copied().zip(areas).collect();
        mobility.populate(&placement, config.sim.unit_speed(), &mut rngs)?;

        let eligibility = if config.sim.area_restricted {
            Eligibility::CompatibleTypes
        } else {
            Eligibility::Any
        };
        let scheduler = ContactScheduler::new(config.sim.contact_radius())?
            .with_eligibility(eligibility)
            .with_conflict(config.conflict);

        let tables = types
            .iter()
            .enumerate()
            .map(|(i, &t)| CacheTable::new(AgentId(i as u32), t, config.cache.capacity))
            .collect();

        info!(
            agents   = n,
            nodes    = network.node_count(),
            roads    = network.road_count(),
            policy   = policy.name(),
            exchange = ?config.exchange,
            "simulation ready"
        );

        Ok(Sim {
            config,
            round: Round::ZERO,
            mobility,
            rngs,
            scheduler,
            tables,
            policy,
            artifacts: self.artifacts,
            weights,
            types,
        })
    }
}
