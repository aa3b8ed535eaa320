//! Common error types for the inventory services.
//!
//! This crate provides unified error handling across the auth library and the gateway.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Authentication-related errors.
///
/// `MalformedToken`, `InvalidSignature` and `TokenExpired` are the three ways
/// token verification can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token creation failed")]
    TokenCreationFailed,

    #[error("Invalid signing key")]
    InvalidSigningKey,

    #[error("Unauthorized")]
    Unauthorized,
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let (code, message) = match err {
            AuthError::InvalidCredentials => ("AUTH_INVALID_CREDENTIALS", "Invalid credentials"),
            // Signature failures are reported like any other bad token.
            AuthError::MalformedToken | AuthError::InvalidSignature => {
                ("AUTH_INVALID_TOKEN", "Invalid token")
            }
            AuthError::TokenExpired => ("AUTH_TOKEN_EXPIRED", "Token has expired"),
            AuthError::TokenCreationFailed => ("AUTH_TOKEN_CREATION_FAILED", "Failed to create token"),
            AuthError::InvalidSigningKey => ("INTERNAL_ERROR", "Internal server error"),
            AuthError::Unauthorized => ("AUTH_UNAUTHORIZED", "Unauthorized"),
        };
        Self::new(code, message)
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self::from(&err)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Auth(auth) => Self::from(auth),
            AppError::Validation(msg) => Self::new("VALIDATION_FAILED", msg.clone()),
            AppError::Internal(_) => Self::new("INTERNAL_ERROR", "Internal server error"),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_failure_does_not_leak_detail() {
        let sig = ErrorResponse::from(AuthError::InvalidSignature);
        let malformed = ErrorResponse::from(AuthError::MalformedToken);
        assert_eq!(sig.code, malformed.code);
        assert_eq!(sig.message, malformed.message);
    }

    #[test]
    fn test_internal_error_hides_message() {
        let err = AppError::Internal("key ring empty".to_string());
        let resp = ErrorResponse::from(&err);
        assert_eq!(resp.code, "INTERNAL_ERROR");
        assert!(!resp.message.contains("key ring"));
    }

    #[test]
    fn test_validation_message_reaches_client() {
        let err = AppError::Validation("username must not be blank".to_string());
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "VALIDATION_FAILED",
                "message": "username must not be blank",
            })
        );
    }
}
