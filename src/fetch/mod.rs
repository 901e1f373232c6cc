mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use tracing::info;

use crate::error::Result;

/// Fetches the feed at `url` once. No retries.
#[tracing::instrument(skip_all, fields(url = %url))]
pub fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &Url) -> Result<String> {
    let body = client.get_text(url)?;
    info!(bytes = body.len(), "Feed body received");
    Ok(body)
}
