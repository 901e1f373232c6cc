//! The fetch, aggregate and render run, as one explicit entry point.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{BitmapRenderer, ChartKind, ChartRenderer, frequency_series, magnitude_series};
use crate::error::Result;
use crate::fetch::{BasicClient, HttpClient, fetch_text};
use crate::output::{OutputPaths, save_raw_response};
use crate::parser::{ParsePolicy, parse_feed};
use crate::query::FeedQuery;
use crate::stats::QuakeStats;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub stats: QuakeStats,
    /// Features dropped under [`ParsePolicy::Lenient`].
    pub skipped: usize,
    /// `None` if the raw body could not be saved.
    pub raw_response: Option<PathBuf>,
    pub charts: Vec<PathBuf>,
}

pub struct Pipeline<C, R> {
    client: C,
    renderer: R,
    query: FeedQuery,
    outputs: OutputPaths,
    policy: ParsePolicy,
}

impl Pipeline<BasicClient, BitmapRenderer> {
    /// The fixed production setup: USGS feed, PNG charts in the working
    /// directory, strict record validation.
    pub fn standard() -> Self {
        Self::new(BasicClient::new(), BitmapRenderer::default())
    }
}

impl<C: HttpClient, R: ChartRenderer> Pipeline<C, R> {
    pub fn new(client: C, renderer: R) -> Self {
        Self {
            client,
            renderer,
            query: FeedQuery::default(),
            outputs: OutputPaths::default(),
            policy: ParsePolicy::default(),
        }
    }

    pub fn with_outputs(mut self, outputs: OutputPaths) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs the whole pipeline once.
    ///
    /// # Errors
    ///
    /// Fetch, parse and chart errors abort the run. A failure to save the raw
    /// response is only logged, since nothing downstream reads that file.
    #[tracing::instrument(skip_all, fields(output_dir = %self.outputs.dir.display(), policy = ?self.policy))]
    pub fn run(&self) -> Result<Report> {
        let url = self.query.url()?;
        let body = fetch_text(&self.client, &url)?;

        let raw_path = self.outputs.raw_response();
        let raw_response = match save_raw_response(&raw_path, &body) {
            Ok(()) => Some(raw_path),
            Err(e) => {
                warn!(error = %e, "Could not save raw response, continuing");
                None
            }
        };

        let parsed = parse_feed(&body, self.policy)?;
        if parsed.skipped > 0 {
            warn!(skipped = parsed.skipped, "Some records were skipped");
        }

        let stats = QuakeStats::from_records(&parsed.records);
        info!(
            total = stats.total,
            years = stats.counts_per_year.len(),
            "Statistics computed"
        );

        let mut charts = Vec::new();
        for kind in ChartKind::ALL {
            let series = match kind {
                ChartKind::Frequency => frequency_series(&stats.counts_per_year),
                ChartKind::Magnitude => magnitude_series(&stats.mean_magnitude_per_year),
            };
            if series.is_empty() {
                info!(?kind, "No data to plot, skipping chart");
                continue;
            }

            let path = self.outputs.chart(kind);
            self.renderer.render(&series, &path)?;
            charts.push(path);
        }

        Ok(Report {
            stats,
            skipped: parsed.skipped,
            raw_response,
            charts,
        })
    }
}

/// Runs the standard pipeline.
pub fn run() -> Result<Report> {
    Pipeline::standard().run()
}
