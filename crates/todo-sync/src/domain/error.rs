//! Domain Layer - Errors
//!
//! Every failure path ends up here and carries a message that can be shown
//! to the user as-is.

use thiserror::Error;

/// Message used when the backend reports a failure without any text
pub const GENERIC_BACKEND_MESSAGE: &str = "An unexpected database error occurred";

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Operation attempted without a signed-in user
    #[error("{0}")]
    AuthRequired(String),

    /// Hosted backend call failed (network, server or GraphQL error)
    #[error("{operation} failed: {message}")]
    Backend { operation: String, message: String },

    /// Identity provider rejected the request
    #[error("{0}")]
    Auth(String),

    /// Caller supplied input that is never sent to the backend
    #[error("{0}")]
    InvalidInput(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// Backend failure for `operation`, substituting the generic message when empty
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_BACKEND_MESSAGE.to_string()
        } else {
            message
        };
        DomainError::Backend {
            operation: operation.into(),
            message,
        }
    }

    /// Text to show in the UI, or `fallback` when the error carries none
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}
