//! Simulation observer trait for progress reporting and data collection.

use cdfl_cache::CacheDiagnostics;
use cdfl_contact::{ContactEvent, RoundContacts};
use cdfl_core::{Round, Tick};
use cdfl_mobility::Car;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points of the
/// round loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_round_end(&mut self, round: Round, contacts: &RoundContacts, diag: &CacheDiagnostics) {
///         println!("{round}: {} contacts, mean age {:.2}", contacts.len(), diag.mean_age);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first round with the initial car placement.
    fn on_sim_start(&mut self, _cars: &[Car]) {}

    /// Called at the start of each round, before mobility.
    fn on_round_start(&mut self, _round: Round) {}

    /// Called once per tick with that tick's contacts (possibly empty).
    fn on_tick_contacts(&mut self, _tick: Tick, _contacts: &[ContactEvent]) {}

    /// Called after aggregation with the round's contacts and cache state.
    fn on_round_end(
        &mut self,
        _round:       Round,
        _contacts:    &RoundContacts,
        _diagnostics: &CacheDiagnostics,
    ) {}

    /// Called once after the final round completes.
    fn on_sim_end(&mut self, _rounds_run: Round) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
