use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode JSON response from {0}")]
    JsonParse(String, #[source] serde_json::Error),

    // Network failed and there is nothing to fall back to
    #[error("No snapshot at '{path}' to fall back to after a failed download")]
    SnapshotMissing {
        path: PathBuf,
        #[source]
        source: Box<FetchError>,
    },

    #[error("Failed to read snapshot file '{0}'")]
    SnapshotRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write snapshot file '{0}'")]
    SnapshotWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode snapshot file '{0}'")]
    SnapshotDecode(PathBuf, #[source] serde_json::Error),

    #[error("Payload for {what} does not have the expected shape")]
    PayloadShape {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// True for failures of the network call itself, the ones that trigger the
    /// snapshot fallback.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            FetchError::NetworkRequest(..) | FetchError::HttpStatus { .. } | FetchError::JsonParse(..)
        )
    }
}
