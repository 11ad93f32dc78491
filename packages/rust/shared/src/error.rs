//! Error types for Sales Insights.
//!
//! Library crates use [`SalesInsightsError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Sales Insights operations.
#[derive(Debug, thiserror::Error)]
pub enum SalesInsightsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Search service error (transport, status, or response decoding).
    #[error("search error: {0}")]
    Search(String),

    /// Text-generation service error.
    #[error("generation error: {0}")]
    Generation(String),

    /// PDF or export serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (missing company name, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SalesInsightsError>;

impl SalesInsightsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The message shown to the user when report generation fails.
    ///
    /// Only the underlying detail is shown, without the variant prefix.
    pub fn user_message(&self) -> String {
        let detail = match self {
            Self::Search(msg) | Self::Generation(msg) | Self::Serialization(msg) => msg.clone(),
            Self::Config { message } | Self::Validation { message } => message.clone(),
            Self::Io { .. } => self.to_string(),
        };
        format!("❌ **Error generating report:** {detail}")
    }
}
