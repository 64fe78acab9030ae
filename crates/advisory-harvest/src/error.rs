//! Error types for the harvester.

use thiserror::Error;

/// Errors that can occur while harvesting.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Transport-level HTTP failure.
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP request failed with status {status} for URL: {url}")]
    Status { url: String, status: u16 },

    /// Output file could not be written.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Records could not be serialized.
    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}
