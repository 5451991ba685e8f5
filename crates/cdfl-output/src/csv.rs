//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `cache_summary.csv`
//! - `cache_agents.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentCacheRow, CacheSummaryRow, OutputResult};

/// Writes cache diagnostics to two CSV files.
pub struct CsvWriter {
    summary:  Writer<File>,
    agents:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summary = Writer::from_path(dir.join("cache_summary.csv"))?;
        summary.write_record(["round", "mean_age", "mean_entries", "total_entries"])?;

        let mut agents = Writer::from_path(dir.join("cache_agents.csv"))?;
        agents.write_record(["round", "agent_id", "entries", "mean_age", "coverage"])?;

        Ok(Self { summary, agents, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_cache_summary(&mut self, row: &CacheSummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.round.to_string(),
            format!("{:.4}", row.mean_age),
            format!("{:.4}", row.mean_entries),
            row.total_entries.to_string(),
        ])?;
        Ok(())
    }

    fn write_agent_rows(&mut self, rows: &[AgentCacheRow]) -> OutputResult<()> {
        for row in rows {
            self.agents.write_record(&[
                row.round.to_string(),
                row.agent_id.to_string(),
                row.entries.to_string(),
                format!("{:.4}", row.mean_age),
                row.coverage.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summary.flush()?;
        self.agents.flush()?;
        Ok(())
    }
}
