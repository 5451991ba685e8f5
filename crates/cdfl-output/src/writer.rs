//! The `OutputWriter` trait implemented by diagnostics backends.

use crate::{AgentCacheRow, CacheSummaryRow, OutputResult};

/// Trait implemented by diagnostics writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one round's summary row.
    fn write_cache_summary(&mut self, row: &CacheSummaryRow) -> OutputResult<()>;

    /// Write a batch of per-agent rows.
    fn write_agent_rows(&mut self, rows: &[AgentCacheRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
