//! Error types for the document pipeline.
//!
//! Every failure is terminal for the current document; the host decides
//! whether to skip the file or fail the build. No retries, no partial
//! output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported across a service boundary (script compiler, style
/// processor, minifier).
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ServiceError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Errors that abort a document's pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The external script compiler rejected the script region.
    #[error("failed to compile script in {file}: {source}")]
    Compile {
        file: String,
        #[source]
        source: ServiceError,
    },

    /// The lazily loaded script compiler could not be resolved.
    #[error("failed to load the script compiler: {source}")]
    CompilerLoad {
        #[source]
        source: ServiceError,
    },

    /// The style processor reported an error; only the first of possibly
    /// several is surfaced.
    #[error("failed to compile style in {file}: {source}")]
    StyleCompile {
        file: String,
        #[source]
        source: ServiceError,
    },

    /// Minifying the supplemental code failed.
    #[error("failed to minify supplemental code: {source}")]
    Minify {
        #[source]
        source: ServiceError,
    },

    /// Minification was requested but no minifier service is configured.
    #[error("minification requested but no minifier service is configured")]
    MinifierUnavailable,
}

impl PipelineError {
    /// Relative path of the offending document, when the error is tied to
    /// one.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Compile { file, .. } | Self::StyleCompile { file, .. } => Some(file),
            _ => None,
        }
    }
}
