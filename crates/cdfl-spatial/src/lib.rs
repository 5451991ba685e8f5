//! `cdfl-spatial` — road network, area views, and edge-list loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (symmetric CSR), `RoadNetworkBuilder`            |
//! | [`area`]    | `AreaPartition`, per-area restricted adjacency                 |
//! | [`loader`]  | `load_edges_csv`, `load_edges_reader` (R-tree endpoint snapping) |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on core types.             |

pub mod area;
pub mod error;
pub mod loader;
pub mod network;


pub use area::AreaPartition;
pub use error::{SpatialError, SpatialResult};
pub use loader::{DEFAULT_SNAP_TOLERANCE, EdgeRecord, load_edges_csv, load_edges_reader};
pub use network::{RoadNetwork, RoadNetworkBuilder};
