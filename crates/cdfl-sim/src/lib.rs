//! `cdfl-sim` — round loop orchestrator for the rust_cdfl framework.
//!
//! # Round loop
//!
//! ```text
//! for round in 0..config.sim.num_rounds:
//!   ① Train      — Trainer::train for every agent, ascending AgentId.
//!   ② Move       — epoch_time one-second mobility steps; contacts are
//!                  detected after every step (ContactScheduler).
//!   ③ Expire     — CacheTable::kick_out on every table.
//!   ④ Exchange   — on_contact for each event in tick order, against a
//!                  snapshot of the post-training artifacts.
//!   ⑤ Aggregate  — combine(own, cache) per agent
//!                  (parallel with the `parallel` feature).
//! ```
//!
//! With `exchange = "direct"`, ③ and ④ are skipped and ⑤ averages each
//! agent with the last partner it met in the round.
//!
//! # Modules
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | `config`   | `RunConfig`, `ExchangeMode`, `TypeBlock` (TOML)       |
//! | `builder`  | `SimBuilder`                                          |
//! | `sim`      | `Sim` and the round loop                              |
//! | `trainer`  | `Trainer` seam, `IdentityTrainer`                     |
//! | `observer` | `SimObserver` hooks, `NoopObserver`                   |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Mobility steps and aggregation run on Rayon's thread pool. |
//! | `fx-hash`  | FxHashMap for the per-tick contact partner map.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cdfl_cache::Artifact;
//! use cdfl_sim::{IdentityTrainer, NoopObserver, RunConfig, SimBuilder};
//! use cdfl_spatial::load_edges_csv;
//!
//! let config  = RunConfig::load("run.toml".as_ref())?;
//! let network = load_edges_csv("edges.csv".as_ref(), 1e-9)?;
//! let models  = vec![Artifact::zeros(10); config.sim.num_agents];
//! let mut sim = SimBuilder::new(config, network, models).build()?;
//! sim.run(&mut IdentityTrainer, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use config::{ExchangeMode, RunConfig, TypeBlock};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use trainer::{IdentityTrainer, Trainer};
