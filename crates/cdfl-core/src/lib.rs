//! `cdfl-core` — foundational types for the `rust_cdfl` caching simulator.
//!
//! Every other `cdfl-*` crate depends on this one.  It has no `cdfl-*`
//! dependencies and keeps its external ones small (`rand`, `thiserror`,
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `AgentType`, `AreaId`                |
//! | [`geo`]         | `Point`, planar Euclidean geometry                        |
//! | [`time`]        | `Tick`, `Round`                                           |
//! | [`config`]      | `SimConfig` (mobility + contact parameters)               |
//! | [`rng`]         | `AgentRng`, `AgentRngs` (per-agent), `SimRng` (global)    |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `SimConfig` from TOML.                    |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AgentId, AgentType, AreaId, NodeId};
pub use rng::{AgentRng, AgentRngs, SimRng};
pub use time::{Round, Tick};
