//! `cdfl-mobility` — continuous car motion over the road graph.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                         |
//! |-------------|------------------------------------------------------------------|
//! | [`state`]   | `Car` — per-agent position, edge, and heading                    |
//! | [`turning`] | `turn_probabilities`, `choose_next_destination`                  |
//! | [`engine`]  | `MobilityEngine` — placement and per-tick advancement            |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                             |
//!
//! # Movement model
//!
//! Every car travels in a straight line from `source` to `destination` at a
//! constant `unit_speed` (coordinate units per second).  When a tick would
//! carry it past the destination it arrives, picks the next node among the
//! destination's neighbors (never reversing onto `previous_source` unless
//! that is the only way out), and spends the rest of the tick on the new
//! edge.  At most one arrival is handled per call to
//! [`engine::advance`].
//!
//! Turning is biased toward going straight: candidates whose direction best
//! matches the current heading share half of the probability mass.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | `MobilityEngine::step` advances cars with Rayon.           |

pub mod engine;
pub mod error;
pub mod state;
pub mod turning;


pub use engine::{MobilityEngine, advance, place_random};
pub use error::{MobilityError, MobilityResult};
pub use state::Car;
pub use turning::{choose_next_destination, turn_probabilities};
