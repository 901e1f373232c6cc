//! Error types shared by the fetch, parse and render stages.

use std::path::PathBuf;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, QuakeError>;

#[derive(Debug, thiserror::Error)]
pub enum QuakeError {
    #[error("invalid feed endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    /// Transport failure talking to the feed.
    #[error("feed request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("feed returned status {status}: {body}")]
    FetchStatus { status: u16, body: String },

    /// Body is not JSON or is not a FeatureCollection.
    #[error("malformed feed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("record {index}: missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render chart {}: {message}", path.display())]
    Chart { path: PathBuf, message: String },
}

impl QuakeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuakeError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn chart(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        QuakeError::Chart {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// `true` for the per-record variants a lenient parse may skip.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            QuakeError::MissingField { .. } | QuakeError::MalformedRecord { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_errors_are_classified() {
        let missing = QuakeError::MissingField {
            index: 3,
            field: "properties.mag",
        };
        assert!(missing.is_record_error());
        assert_eq!(missing.to_string(), "record 3: missing field 'properties.mag'");

        let status = QuakeError::FetchStatus {
            status: 503,
            body: "busy".to_string(),
        };
        assert!(!status.is_record_error());
        assert_eq!(status.to_string(), "feed returned status 503: busy");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = QuakeError::io(
            "out/earthquakes_data.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/earthquakes_data.json"));
    }
}
