//! DTOs for the registration endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request to register a new account.
///
/// When invite-only mode is enabled, `invitation_key` must carry a valid
/// key from an invitation email.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Email address for the new account.
    pub email: String,

    /// Password for the new account.
    pub password: String,

    /// Invitation key from the email link.
    #[serde(default)]
    pub invitation_key: Option<String>,
}

impl RegisterRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() {
            return Some("Email is required".to_string());
        }
        if !email.contains('@') || !email.contains('.') {
            return Some("Invalid email format".to_string());
        }
        if self.password.len() < 8 {
            return Some("Password must be at least 8 characters".to_string());
        }
        None
    }
}

/// Response after successful registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created user.
    pub user_id: Uuid,

    /// Email the account was registered with.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_valid() {
        let request = RegisterRequest {
            email: "new@example.com".to_string(),
            password: "SecurePass123".to_string(),
            invitation_key: Some("abc".to_string()),
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_register_request_empty_email() {
        let request = RegisterRequest {
            email: "".to_string(),
            password: "SecurePass123".to_string(),
            invitation_key: None,
        };
        assert_eq!(request.validate(), Some("Email is required".to_string()));
    }

    #[test]
    fn test_register_request_short_password() {
        let request = RegisterRequest {
            email: "new@example.com".to_string(),
            password: "short".to_string(),
            invitation_key: None,
        };
        assert_eq!(
            request.validate(),
            Some("Password must be at least 8 characters".to_string())
        );
    }
}
