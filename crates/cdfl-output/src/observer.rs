//! `SimOutputObserver<W>` — bridges `SimObserver` to the output writers.

use cdfl_cache::CacheDiagnostics;
use cdfl_contact::{ContactEvent, RoundContacts};
use cdfl_core::{Round, Tick};
use cdfl_mobility::Car;
use cdfl_sim::{RunConfig, SimObserver};

use crate::row::{AgentCacheRow, CacheSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, TranscriptWriter};

/// A [`SimObserver`] that writes cache diagnostics to any [`OutputWriter`]
/// backend and, if attached, contact transcripts to a [`TranscriptWriter`].
///
/// Errors from the writers are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    transcript: Option<TranscriptWriter>,
    epoch_time: u32,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to map ticks to
    /// seconds within a round.
    pub fn new(writer: W, config: &RunConfig) -> Self {
        Self {
            writer,
            transcript: None,
            epoch_time: config.sim.epoch_time,
            last_error: None,
        }
    }

    /// Also write `pair.txt` and `area.txt`.
    pub fn with_transcript(mut self, transcript: TranscriptWriter) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_sim_start(&mut self, cars: &[Car]) {
        if let Some(t) = self.transcript.as_mut() {
            let result = t.write_areas(cars);
            self.store_err(result);
        }
    }

    fn on_round_start(&mut self, round: Round) {
        if let Some(t) = self.transcript.as_mut() {
            let result = t.begin_round(round);
            self.store_err(result);
        }
    }

    fn on_tick_contacts(&mut self, tick: Tick, contacts: &[ContactEvent]) {
        let second = tick.second_of_round(self.epoch_time);
        if let Some(t) = self.transcript.as_mut() {
            let result = t.write_tick(second, contacts);
            self.store_err(result);
        }
    }

    fn on_round_end(
        &mut self,
        round:       Round,
        _contacts:   &RoundContacts,
        diagnostics: &CacheDiagnostics,
    ) {
        let result = self.writer.write_cache_summary(&CacheSummaryRow::from(diagnostics));
        self.store_err(result);

        let rows: Vec<AgentCacheRow> = diagnostics
            .per_agent
            .iter()
            .map(|s| AgentCacheRow::from_stats(round.0, s))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_agent_rows(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _rounds_run: Round) {
        let result = self.writer.finish();
        self.store_err(result);
        if let Some(t) = self.transcript.as_mut() {
            let result = t.finish();
            self.store_err(result);
        }
    }
}
