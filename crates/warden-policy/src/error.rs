//! Error types for policy construction
//!
//! Policy evaluation itself never fails; errors only arise while building a
//! table, from a malformed pattern or an unreadable configuration.

use thiserror::Error;

/// Policy error types.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A row pattern is not a valid regular expression
    #[error("Invalid {field} pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Which pattern of the row: roles, classes, or methods.
        field: &'static str,
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A policy table configuration could not be read
    #[error("Invalid policy configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

impl PolicyError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PolicyError::InvalidPattern { .. } => "INVALID_PATTERN",
            PolicyError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
