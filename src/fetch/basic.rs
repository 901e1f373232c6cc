use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use super::client::HttpClient;
use crate::error::{QuakeError, Result};

/// [`HttpClient`] backed by a plain blocking reqwest client, default timeouts.
pub struct BasicClient(Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for BasicClient {
    fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.0.get(url.clone()).send()?;
        let status = response.status();
        debug!(%status, "Feed responded");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakeError::FetchStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text()?)
    }
}
