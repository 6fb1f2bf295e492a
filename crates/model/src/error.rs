//! Error types shared by every stage of the recommendation pipeline.
//!
//! Each failure category has exactly one user-facing message, produced by
//! the `Display` impl. Provider payloads never end up in these messages;
//! callers that want the raw details should look at the logs.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The pipeline stage an error (or a log line) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Validation,
    Detection,
    Suggestion,
    Lookup,
    Translation,
    Network,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Detection => "detection",
            Stage::Suggestion => "suggestion",
            Stage::Lookup => "lookup",
            Stage::Translation => "translation",
            Stage::Network => "network",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a recommendation request.
///
/// Detection and translation never produce one of these: both stages fall
/// back to a default instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The mood was empty or whitespace only
    #[error("Input Required: Please enter your mood.")]
    Validation,

    /// The language model failed or returned no usable title
    #[error("Could not get a movie suggestion: {reason}")]
    Suggestion { reason: String },

    /// The metadata provider answered, but has no movie under this title
    #[error("Movie \"{title}\" not found")]
    NotFound { title: String },

    /// The metadata provider failed for any other reason
    #[error("Could not look up \"{title}\": {reason}")]
    Lookup { title: String, reason: String },

    /// Connectivity was lost (or a request timed out) while `during` was running
    #[error("Network error: Please ensure your device has internet access.")]
    Network { during: Stage },
}

impl PipelineError {
    /// The failure category reported to the caller.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Validation => Stage::Validation,
            PipelineError::Suggestion { .. } => Stage::Suggestion,
            PipelineError::NotFound { .. } | PipelineError::Lookup { .. } => Stage::Lookup,
            PipelineError::Network { .. } => Stage::Network,
        }
    }
}

/// Convenience type alias for Results in the pipeline crates
pub type Result<T> = std::result::Result<T, PipelineError>;
