//! Error types for access control operations
//!
//! Read-only evaluation (`grants`/`denies`) never fails. Errors come from
//! two places only: building an entry without a strategy, and changing the
//! rules of a securable without holding the SECURE grant on it.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A securing attempt by a principal that does not hold the required grant.
///
/// `principal` is `None` when the attempt named no acting party at all.
#[derive(Debug, Clone, Error)]
#[error("{} is not authorized to {action:?}", describe_principal(.principal))]
pub struct AuthorizationError<P: fmt::Debug, A: fmt::Debug> {
    /// The principal that attempted the change.
    pub principal: Option<P>,
    /// The action it lacked.
    pub action: A,
    /// Caller context supplied with the attempt, if any.
    pub data: Option<Value>,
}

impl<P: fmt::Debug, A: fmt::Debug> AuthorizationError<P, A> {
    /// Create an authorization error without caller context.
    pub fn new(principal: Option<P>, action: A) -> Self {
        Self {
            principal,
            action,
            data: None,
        }
    }

    /// Attach caller context.
    pub fn with_data(mut self, data: Option<Value>) -> Self {
        self.data = data;
        self
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        "E_UNAUTHORIZED"
    }
}

fn describe_principal<P: fmt::Debug>(principal: &Option<P>) -> String {
    match principal {
        Some(principal) => format!("{:?}", principal),
        None => "Unidentified principal".to_string(),
    }
}

/// Access control error types.
#[derive(Debug, Error)]
pub enum AclError<P: fmt::Debug, A: fmt::Debug> {
    /// An entry was built without a strategy.
    #[error("Configuration error: no strategy given")]
    MissingStrategy,

    /// The acting principal may not change this securable's rules.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError<P, A>),
}

impl<P: fmt::Debug, A: fmt::Debug> AclError<P, A> {
    /// Check if this error was raised while building rules rather than
    /// while applying them.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, AclError::MissingStrategy)
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AclError::MissingStrategy => "E_CONFIGURATION",
            AclError::Unauthorized(e) => e.error_code(),
        }
    }
}

/// Result type for access control operations.
pub type AclResult<T, P, A> = Result<T, AclError<P, A>>;
