//! Persist the resolved run configuration next to the outputs.

use std::path::Path;

use cdfl_sim::RunConfig;
use tracing::debug;

use crate::OutputResult;

/// Write `config` to `dir/configuration.toml`.
pub fn write_configuration(dir: &Path, config: &RunConfig) -> OutputResult<()> {
    let path = dir.join("configuration.toml");
    std::fs::write(&path, toml::to_string_pretty(config)?)?;
    debug!(path = %path.display(), "configuration written");
    Ok(())
}
