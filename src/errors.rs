// src/errors.rs

//! Crate-wide error type.
//!
//! Failures fall into three groups:
//! - configuration problems, raised before any lifecycle hook fires;
//! - pattern evaluation problems (bad glob syntax, unreadable directories);
//! - errors returned by user callbacks, passed through untouched.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrebuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("pattern evaluation failed: {0:#}")]
    PatternEvaluation(anyhow::Error),

    /// Error returned by a user-supplied build or watch callback.
    #[error(transparent)]
    Callback(anyhow::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),
}

impl PrebuildError {
    /// True for failures that came out of a user callback.
    pub fn is_callback_error(&self) -> bool {
        matches!(self, PrebuildError::Callback(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PrebuildError>;
