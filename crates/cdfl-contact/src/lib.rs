//! `cdfl-contact` — who is within radio range of whom, tick by tick.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`event`]     | `ContactEvent` — an unordered `(tick, a, b)` pair             |
//! | [`policy`]    | `ConflictPolicy`, `Eligibility`                               |
//! | [`scheduler`] | `ContactScheduler` — per-tick detection and round generation  |
//! | [`schedule`]  | `RoundContacts`, `ContactSchedule`                            |
//! | [`error`]     | `ContactError`, `ContactResult<T>`                            |
//!
//! # Per-tick detection
//!
//! ```text
//! ① bulk-load an R-tree of car positions
//! ② radius query per car → candidate pairs (a < b, distance ≤ radius)
//! ③ drop pairs the eligibility rule forbids
//! ④ resolve conflicts so every car is in at most one contact
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `fx-hash`  | FxHash for the partner map used during conflict resolution|
//! | `serde`    | Serde derives on events and policies                      |
//! | `parallel` | Rayon mobility phase while generating rounds              |

pub mod error;
pub mod event;
pub mod policy;
pub mod schedule;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{ContactError, ContactResult};
pub use event::ContactEvent;
pub use policy::{ConflictPolicy, Eligibility};
pub use schedule::{ContactSchedule, RoundContacts};
pub use scheduler::ContactScheduler;
