//! Error types for crimecast.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for every stage of the pipeline.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt file not found: {}", .0.display())]
    PromptNotFound(PathBuf),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Broad error category, one per failure class of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or malformed configuration, raised before any network call.
    Configuration,
    /// Prompt or output file access.
    Io,
    /// Anything that went wrong talking to a remote service.
    Service,
}

impl StoryError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Wrap an IO error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::PromptNotFound(_) | Self::Io { .. } | Self::InvalidPrompt(_) => {
                ErrorCategory::Io
            }
            Self::Api { .. }
            | Self::Authentication(_)
            | Self::RateLimited(_)
            | Self::Network(_)
            | Self::Serialization(_)
            | Self::Timeout(_)
            | Self::InvalidResponse(_)
            | Self::InvalidArgument(_) => ErrorCategory::Service,
        }
    }

    /// Render the error followed by every `source()` in its chain.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let _ = write!(out, "\n  caused by: {cause}");
            source = cause.source();
        }
        out
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StoryError>;
