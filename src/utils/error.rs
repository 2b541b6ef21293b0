// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Errors surfaced by the facade. Bad levels and missing options never end up
// here: they degrade to defaults instead.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Could not prepare log directory {}: {source}", path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open rotating file sink {}: {reason}", path.display())]
    FileSink { path: PathBuf, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors
}
