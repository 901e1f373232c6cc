//! Output formatting and persistence for earthquake statistics.
//!
//! Covers the console summary, the JSON debug dump and the raw response file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::chart::ChartKind;
use crate::error::{QuakeError, Result};
use crate::pipeline::Report;

pub const RAW_RESPONSE_FILE: &str = "earthquakes_data.json";

/// Where a run writes its files. All names are fixed; only the directory moves.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub dir: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn raw_response(&self) -> PathBuf {
        self.dir.join(RAW_RESPONSE_FILE)
    }

    pub fn chart(&self, kind: ChartKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Directory a temp sibling of `path` should be created in.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Writes `bytes` to `path` via a temp file in the same directory, so `path`
/// either holds the full contents or is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| QuakeError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| QuakeError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| QuakeError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| QuakeError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| QuakeError::io(path, e.error))?;

    Ok(())
}

/// Saves the feed body verbatim for later inspection.
#[tracing::instrument(skip_all, fields(path = %path.display(), bytes = body.len()))]
pub fn save_raw_response(path: &Path, body: &str) -> Result<()> {
    write_atomic(path, body.as_bytes())?;
    debug!("Raw response saved");
    Ok(())
}

/// Human-readable summary of a run, one line per entry.
pub fn summary_lines(report: &Report) -> Vec<String> {
    let stats = &report.stats;
    let mut lines = vec![format!("Loaded {} earthquakes", stats.total)];

    if report.skipped > 0 {
        lines.push(format!("Skipped {} malformed records", report.skipped));
    }

    match &stats.strongest {
        Some(max) => lines.push(format!(
            "The strongest earthquake was at {} with magnitude {}",
            max.location, max.magnitude
        )),
        None => lines.push("No earthquakes found".to_string()),
    }

    if !stats.counts_per_year.is_empty() {
        lines.push("Earthquakes per year:".to_string());
        for (year, count) in &stats.counts_per_year {
            lines.push(format!("  {year}: {count}"));
        }
    }

    if !stats.mean_magnitude_per_year.is_empty() {
        lines.push("Average magnitude per year:".to_string());
        for (year, mean) in &stats.mean_magnitude_per_year {
            lines.push(format!("  {year}: {mean:.2}"));
        }
    }

    if let Some(path) = &report.raw_response {
        lines.push(format!("Raw response saved to {}", path.display()));
    }
    for path in &report.charts {
        lines.push(format!("Chart saved to {}", path.display()));
    }

    lines
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &Report) -> serde_json::Result<()> {
    debug!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
