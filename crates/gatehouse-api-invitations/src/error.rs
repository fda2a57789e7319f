//! Error types for the invitation API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during invitation and registration operations.
#[derive(Debug, Error)]
pub enum InvitationError {
    /// Validation error for request input (with optional field).
    #[error("Validation error: {message}")]
    ValidationField {
        message: String,
        field: Option<String>,
    },

    /// Simple validation error (string only).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication required or claims invalid.
    #[error("{0}")]
    Unauthorized(String),

    /// Not authorized to perform this action.
    #[error("{0}")]
    Forbidden(String),

    /// Registration attempted without presenting an invitation key.
    #[error("An invitation key is required to register")]
    NoKey,

    /// The presented invitation key is unknown, exhausted, or expired.
    #[error("{0}")]
    InvalidKey(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Resource already exists (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Email dispatch failed.
    #[error("Email delivery failed: {0}")]
    Email(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response format for API errors.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl InvitationError {
    /// Create a validation error for a specific field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationField {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<sqlx::Error> for InvitationError {
    fn from(err: sqlx::Error) -> Self {
        InvitationError::Database(err.to_string())
    }
}

impl IntoResponse for InvitationError {
    fn into_response(self) -> Response {
        let (status, error_code, message, field) = match &self {
            InvitationError::ValidationField { message, field } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.clone(),
                field.clone(),
            ),
            InvitationError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg.clone(),
                None,
            ),
            InvitationError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone(), None)
            }
            InvitationError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, "forbidden", msg.clone(), None)
            }
            InvitationError::NoKey => (
                StatusCode::FORBIDDEN,
                "no_key",
                "An invitation key is required to register".to_string(),
                None,
            ),
            InvitationError::InvalidKey(msg) => {
                (StatusCode::GONE, "invalid_key", msg.clone(), None)
            }
            InvitationError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "not_found", msg.clone(), None)
            }
            InvitationError::Conflict(msg) => {
                (StatusCode::CONFLICT, "conflict", msg.clone(), None)
            }
            InvitationError::Email(e) => {
                tracing::error!("Email delivery failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "email_error",
                    "Failed to send invitation email".to_string(),
                    None,
                )
            }
            InvitationError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
            InvitationError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
            field,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_with_field() {
        let error = InvitationError::validation_field("Email is required", "email");
        match error {
            InvitationError::ValidationField { message, field } => {
                assert_eq!(message, "Email is required");
                assert_eq!(field, Some("email".to_string()));
            }
            _ => panic!("Expected ValidationField error"),
        }
    }

    #[test]
    fn test_no_key_maps_to_forbidden() {
        let response = InvitationError::NoKey.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_key_maps_to_gone() {
        let response =
            InvitationError::InvalidKey("The invitation key is not valid".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let response =
            InvitationError::Conflict("An account with this email already exists".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_database_detail_not_leaked() {
        let error = InvitationError::Database("connection refused at 10.0.0.3".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
