//! Error types for MongoDB access and loading.

use thiserror::Error;

/// Errors that can occur while reading from or loading into MongoDB.
#[derive(Error, Debug)]
pub enum StoreError {
    /// MongoDB connection or query error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// Records file could not be read.
    #[error("Failed to read records file: {0}")]
    Io(#[from] std::io::Error),

    /// Records file is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Records file does not hold a top-level array.
    #[error("Expected a JSON array of records")]
    NotAnArray,

    /// An array element is not a JSON object.
    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// An object could not be represented as a BSON document.
    #[error("Record {index} cannot be converted to BSON: {source}")]
    Bson {
        index: usize,
        #[source]
        source: bson::ser::Error,
    },
}
