//! `cdfl-output` — simulation output writers for the rust_cdfl framework.
//!
//! | Writer             | Files created                                    |
//! |--------------------|--------------------------------------------------|
//! | [`TranscriptWriter`] | `pair.txt`, `area.txt`                         |
//! | [`CsvWriter`]      | `cache_summary.csv`, `cache_agents.csv`          |
//! | [`write_configuration`] | `configuration.toml`                        |
//!
//! Diagnostics backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `cdfl_sim::SimObserver` and
//! optionally feeds a [`TranscriptWriter`] as well.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cdfl_output::{CsvWriter, SimOutputObserver, TranscriptWriter, write_configuration};
//!
//! write_configuration(out_dir, &config)?;
//! let mut obs = SimOutputObserver::new(CsvWriter::new(out_dir)?, &config)
//!     .with_transcript(TranscriptWriter::new(out_dir)?);
//! sim.run(&mut trainer, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod config;
pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod transcript;
pub mod writer;


pub use config::write_configuration;
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentCacheRow, CacheSummaryRow};
pub use transcript::TranscriptWriter;
pub use writer::OutputWriter;
