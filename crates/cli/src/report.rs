// Path: crates/cli/src/report.rs
//! The JSON report of a finished command.

use anyhow::{Context, Result};
use gauntlet_types::app::CommandResult;
use std::path::{Path, PathBuf};

/// Selects the report file name, without extension.
pub const REPORT_NAME_ENV: &str = "REPORT_NAME";

const DEFAULT_REPORT_NAME: &str = "report";

/// `<name>.json`, where `name` falls back to `report` when unset or blank.
pub fn report_path(name: Option<&str>) -> PathBuf {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_REPORT_NAME);
    PathBuf::from(format!("{}.json", name))
}

/// The report path selected by `REPORT_NAME`.
pub fn report_path_from_env() -> PathBuf {
    report_path(std::env::var(REPORT_NAME_ENV).ok().as_deref())
}

/// Writes `result` as pretty-printed JSON to `path`.
pub fn write_report(path: &Path, result: &CommandResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serializing report")?;
    std::fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    tracing::info!(target: "gauntlet", path = %path.display(), "report written");
    Ok(())
}
