use std::path::PathBuf;
use thiserror::Error;

/// The main error type for viatab operations.
#[derive(Debug, Error)]
pub enum ViatabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse VIA JSON from {path}: {source}")]
    ViaJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid VIA JSON in {path}: {message}")]
    ViaJsonInvalid { path: PathBuf, message: String },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
