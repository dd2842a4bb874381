// src/error.rs

//! Unified error handling for the poster application.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for poster operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The catalog returned no items, nothing can be selected
    #[error("Catalog is empty, nothing to publish")]
    EmptyCatalog,

    /// Catalog listing rejected by the upstream service
    #[error("Catalog listing failed ({status}): {message}")]
    Catalog { status: u16, message: String },

    /// Publish call rejected by the upstream service
    #[error("Publish failed for {item} ({status}): {message}")]
    Publish {
        item: String,
        status: u16,
        message: String,
    },

    /// Some selected items could not be published
    #[error("{failed} of {total} item(s) failed to publish")]
    Incomplete { failed: usize, total: usize },

    /// State file could not be written
    #[error("Failed to persist state to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a catalog listing error.
    pub fn catalog(status: u16, message: impl fmt::Display) -> Self {
        Self::Catalog {
            status,
            message: message.to_string(),
        }
    }

    /// Create a publish error for an item.
    pub fn publish(item: impl Into<String>, status: u16, message: impl fmt::Display) -> Self {
        Self::Publish {
            item: item.into(),
            status,
            message: message.to_string(),
        }
    }

    /// Create a persistence error for a state path.
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}
