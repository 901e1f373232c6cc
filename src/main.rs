//! CLI entry point for quake_stats.
//!
//! Fetches the British Isles earthquake feed, prints the summary statistics
//! and writes the per-year charts. The query and output paths are fixed.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use quake_stats::output::{print_json, summary_lines};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quake_stats", version)]
#[command(
    about = "Summarize British Isles earthquakes from the USGS feed",
    long_about = None
)]
struct Cli {}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _cli = Cli::parse();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quake_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quake_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!("Starting earthquake summary run");
    let report = quake_stats::run().context("earthquake summary run failed")?;

    if let Err(e) = print_json(&report) {
        warn!(error = %e, "Could not serialize report");
    }

    for line in summary_lines(&report) {
        println!("{line}");
    }

    Ok(())
}
