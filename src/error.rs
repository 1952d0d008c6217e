// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems. A run stops when one of these is raised.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("job_search.keywords must contain at least one keyword")]
    EmptyKeywords,

    #[error("Invalid schedule time '{0}', expected HH:MM")]
    InvalidScheduleTime(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Soft failures that affect a single posting or feed. Logged and skipped.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Failed to write {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Typst compilation failed for {path}: {message}")]
    Compile { path: PathBuf, message: String },

    #[error("Feed {url} unavailable: {message}")]
    Feed { url: String, message: String },
}
