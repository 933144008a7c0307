//! Core error types
//!
//! `AppError` covers the persistence-side failures shared between the
//! record store and the API layer. Pipeline-stage errors (decode,
//! classification, credential signing) live in their own crates and are
//! composed by the orchestrator.

use sqlx::Error as SqlxError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable error code for logs and API bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure was caused by the client's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_) | AppError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_client_error() {
        let err = AppError::InvalidInput("longitude out of range".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn internal_is_not_client_error() {
        let err = AppError::Internal("boom".to_string());
        assert!(!err.is_client_error());
    }
}
