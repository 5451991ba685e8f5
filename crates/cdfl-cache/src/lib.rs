//! `cdfl-cache` — per-agent model caches and aggregation.
//!
//! Every agent owns a [`CacheTable`] of artifacts it received from peers it
//! met.  A contact inserts a snapshot of each endpoint's artifact into the
//! other's table; a bounded capacity (and optionally per-type quotas or a
//! diversity score) decides what gets evicted.  At the end of each round
//! every agent replaces its artifact with the weighted mean of its own and
//! everything cached.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`artifact`]    | `Artifact` — immutable `f32` parameter vector                |
//! | [`table`]       | `CacheEntry`, `CacheTable`, timeout eviction                 |
//! | [`policy`]      | `EvictionPolicy` trait, plain / type-quota / distribution    |
//! | [`labels`]      | `LabelStats` — per-agent label counts and diversity scores   |
//! | [`exchange`]    | `on_contact` — symmetric cache update for one contact        |
//! | [`aggregate`]   | `combine`, `average_pair` — weighted means                   |
//! | [`diagnostics`] | `CacheDiagnostics` — sizes, ages, coverage                   |
//! | [`config`]      | `CacheConfig`, `PolicyConfig`                                |
//! | [`error`]       | `CacheError`, `AggregateError`                               |

pub mod aggregate;
pub mod artifact;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exchange;
pub mod labels;
pub mod policy;
pub mod table;


pub use aggregate::{average_pair, combine};
pub use artifact::Artifact;
pub use config::{CacheConfig, OwnerQuotas, PolicyConfig, TypeQuota};
pub use diagnostics::{AgentCacheStats, CacheDiagnostics};
pub use error::{AggregateError, CacheError, CacheResult};
pub use exchange::{PeerSnapshot, on_contact};
pub use labels::LabelStats;
pub use policy::{
    Admission, CachePolicy, DistributionPolicy, EvictionPolicy, PlainPolicy, QuotaTable, TypeQuotaPolicy,
};
pub use table::{CacheEntry, CacheTable};
