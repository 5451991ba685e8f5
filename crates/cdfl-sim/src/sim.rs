//! The `Sim` struct and its round loop.

use tracing::info;

use cdfl_cache::{
    AggregateError, Artifact, CacheDiagnostics, CachePolicy, CacheTable, PeerSnapshot,
    average_pair, combine, on_contact,
};
use cdfl_contact::{ContactScheduler, RoundContacts};
use cdfl_core::{AgentId, AgentRngs, AgentType, Round};
use cdfl_mobility::MobilityEngine;

use crate::{ExchangeMode, RunConfig, SimObserver, SimResult, Trainer};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each round runs five phases:
///
/// 1. **Train**: every agent's artifact is replaced by the trainer's output,
///    in ascending `AgentId` order.
/// 2. **Move**: cars drive `epoch_time` one-second ticks; contacts are
///    detected after every tick.
/// 3. **Expire**: cache entries older than `kick_out_window` rounds are
///    dropped.
/// 4. **Exchange**: every contact stores a snapshot of each side's artifact
///    in the other's cache, in tick order.
/// 5. **Aggregate**: each agent replaces its artifact with the weighted mean
///    of itself and its cache (optionally parallel).
///
/// In [`ExchangeMode::Direct`] phases 3 and 4 are skipped and each agent
/// averages with the last partner it met in the round instead.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: RunConfig,

    /// The next round to run.
    pub round: Round,

    pub mobility: MobilityEngine,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    pub scheduler: ContactScheduler,

    /// Cache tables indexed by `AgentId`.
    pub tables: Vec<CacheTable>,

    pub policy: CachePolicy,

    /// Current artifacts indexed by `AgentId`.
    pub artifacts: Vec<Artifact>,

    /// Aggregation weights indexed by `AgentId`.
    pub weights: Vec<f64>,

    pub types: Vec<AgentType>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every remaining round up to `config.sim.num_rounds`.
    ///
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<T: Trainer, O: SimObserver>(
        &mut self,
        trainer:  &mut T,
        observer: &mut O,
    ) -> SimResult<()> {
        observer.on_sim_start(&self.mobility.cars);
        while self.round.0 < self.config.sim.num_rounds {
            self.step_round(trainer, observer)?;
        }
        observer.on_sim_end(self.round);
        info!(rounds = self.round.0, "simulation finished");
        Ok(())
    }

    /// Run exactly `n` rounds from the current position (ignores
    /// `num_rounds`).  Useful for tests and incremental stepping.
    pub fn run_rounds<T: Trainer, O: SimObserver>(
        &mut self,
        n:        u32,
        trainer:  &mut T,
        observer: &mut O,
    ) -> SimResult<()> {
        for _ in 0..n {
            self.step_round(trainer, observer)?;
        }
        Ok(())
    }

    /// Run one full round and return its contacts.
    pub fn step_round<T: Trainer, O: SimObserver>(
        &mut self,
        trainer:  &mut T,
        observer: &mut O,
    ) -> SimResult<RoundContacts> {
        let round = self.round;
        observer.on_round_start(round);

        // ── Phase 1: local training ───────────────────────────────────────
        for (i, artifact) in self.artifacts.iter_mut().enumerate() {
            *artifact = trainer.train(AgentId(i as u32), round, artifact);
        }

        // ── Phase 2: mobility + contacts ──────────────────────────────────
        let contacts = self.scheduler.run_round(
            round,
            self.config.sim.epoch_time,
            &mut self.mobility,
            &mut self.rngs,
        )?;
        for (s, events) in contacts.per_tick.iter().enumerate() {
            observer.on_tick_contacts(contacts.first_tick + s as u64, events);
        }

        // ── Phases 3–5: exchange + aggregation ────────────────────────────
        let aggregated = match self.config.exchange {
            ExchangeMode::Cache  => {
                self.exchange(round, &contacts);
                self.aggregate_cached()?
            }
            ExchangeMode::Direct => self.aggregate_direct(&contacts)?,
        };
        self.artifacts = aggregated;

        let diagnostics = CacheDiagnostics::collect(round, &self.tables);
        info!(
            round    = round.0,
            contacts = contacts.len(),
            entries  = diagnostics.total_entries,
            mean_age = diagnostics.mean_age,
            "round complete"
        );
        observer.on_round_end(round, &contacts, &diagnostics);

        self.round = round.next();
        Ok(contacts)
    }

    // ── Round phases ──────────────────────────────────────────────────────

    fn exchange(&mut self, round: Round, contacts: &RoundContacts) {
        let window = self.config.cache.kick_out_window;
        for table in &mut self.tables {
            table.kick_out(round, window);
        }

        // Every contact of the round sees the post-training artifacts, not
        // the aggregate of an earlier contact.
        let snapshot = PeerSnapshot { artifacts: &self.artifacts, types: &self.types };
        for event in contacts.events() {
            on_contact(&mut self.tables, event.a, event.b, &snapshot, round, &self.policy);
        }
    }

    fn aggregate_cached(&self) -> Result<Vec<Artifact>, AggregateError> {
        let one = |(i, table): (usize, &CacheTable)| {
            combine(&self.artifacts[i], self.weights[i], table, &self.weights)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.tables.par_iter().enumerate().map(one).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.tables.iter().enumerate().map(one).collect()
        }
    }

    fn aggregate_direct(&self, contacts: &RoundContacts) -> Result<Vec<Artifact>, AggregateError> {
        contacts
            .last_partners(self.artifacts.len())
            .into_iter()
            .enumerate()
            .map(|(i, partner)| match partner {
                Some(p) => average_pair(
                    AgentId(i as u32),
                    &self.artifacts[i],
                    self.weights[i],
                    p,
                    &self.artifacts[p.index()],
                    self.weights[p.index()],
                ),
                None => Ok(self.artifacts[i].clone()),
            })
            .collect()
    }
}
