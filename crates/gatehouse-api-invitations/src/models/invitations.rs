//! DTOs for creating, checking, and bulk-sending invitations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of an email address per RFC 5321.
const MAX_EMAIL_LEN: usize = 254;

fn email_format_error(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !email.contains('@') || !email.contains('.') {
        return Some("Invalid email format".to_string());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Some("Email address too long (max 254 characters)".to_string());
    }
    None
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request to create and send a single invitation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateInvitationRequest {
    /// Email address of the person to invite.
    pub email: String,

    /// Optional personal note included in the invitation email.
    #[serde(default)]
    pub note: Option<String>,
}

impl CreateInvitationRequest {
    /// Validate the request and return an error message if invalid.
    ///
    /// Only the email format is checked here; quota, self-invitation, and
    /// block-list rules need the inviter's context and live in the
    /// validation service.
    pub fn validate(&self) -> Option<String> {
        email_format_error(self.email.trim())
    }
}

/// Request to send invitations to multiple addresses at once.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkInvitationRequest {
    /// Comma-separated list of email addresses.
    pub emails: String,

    /// Optional personal note included in each invitation email.
    #[serde(default)]
    pub note: Option<String>,
}

impl BulkInvitationRequest {
    /// Split the comma-separated list into trimmed, non-empty addresses.
    pub fn addresses(&self) -> Vec<&str> {
        self.emails
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if self.addresses().is_empty() {
            return Some("You did not provide any email addresses".to_string());
        }
        None
    }
}

/// Request to grant extra invitations to a user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GrantQuotaRequest {
    /// User receiving the invitations.
    pub user_id: Uuid,

    /// Number of invitations to add.
    pub amount: i32,
}

impl GrantQuotaRequest {
    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Option<String> {
        if self.amount < 1 {
            return Some("Amount must be at least 1".to_string());
        }
        None
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response after creating an invitation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvitationResponse {
    /// Unique invitation identifier.
    pub id: Uuid,

    /// Email address the invitation was sent to.
    pub email: String,

    /// When the invitation was created. Expiry is measured from here.
    pub created_at: DateTime<Utc>,

    /// Invitations the sender has left after this one.
    pub remaining: i32,
}

/// Response for the remaining-quota endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RemainingResponse {
    /// Invitations the caller has left to send.
    pub remaining: i32,
}

/// Response after granting extra invitations to a user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GrantQuotaResponse {
    /// User who received the invitations.
    pub user_id: Uuid,

    /// The user's quota after the grant.
    pub remaining: i32,
}

/// Response when an invitation key is presented for inspection.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvitedResponse {
    /// The presented key, echoed back for the registration form.
    pub invitation_key: String,

    /// Always true; invalid keys produce an error response instead.
    pub valid: bool,
}

/// Response after dispatching bulk invitations.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkInvitationResponse {
    /// Number of invitations successfully dispatched.
    pub sent: usize,

    /// Addresses that were invited.
    pub recipients: Vec<String>,

    /// Addresses that were skipped, with the reason for each.
    pub failed: Vec<BulkInvitationFailure>,
}

/// A single address the bulk dispatch could not invite.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkInvitationFailure {
    /// The address as it appeared in the request.
    pub email: String,

    /// Why the invitation was not sent.
    pub message: String,
}

/// One entry in the caller's sent-invitations list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvitationKeySummary {
    /// Unique invitation identifier.
    pub id: Uuid,

    /// Redemptions left on this key.
    pub uses_left: i32,

    /// When the invitation was created.
    pub created_at: DateTime<Utc>,

    /// Whether the key can still be redeemed.
    pub usable: bool,
}

/// Response after sweeping expired invitation keys.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SweepResponse {
    /// Number of expired keys deleted.
    pub deleted: u64,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_invitation_request_valid() {
        let request = CreateInvitationRequest {
            email: "friend@example.com".to_string(),
            note: None,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_invitation_request_empty_email() {
        let request = CreateInvitationRequest {
            email: "".to_string(),
            note: None,
        };
        assert_eq!(request.validate(), Some("Email is required".to_string()));
    }

    #[test]
    fn test_create_invitation_request_invalid_email() {
        let request = CreateInvitationRequest {
            email: "not-an-email".to_string(),
            note: None,
        };
        assert_eq!(request.validate(), Some("Invalid email format".to_string()));
    }

    #[test]
    fn test_create_invitation_request_overlong_email() {
        let request = CreateInvitationRequest {
            email: format!("{}@example.com", "a".repeat(250)),
            note: None,
        };
        assert_eq!(
            request.validate(),
            Some("Email address too long (max 254 characters)".to_string())
        );
    }

    #[test]
    fn test_bulk_request_splits_and_trims_addresses() {
        let request = BulkInvitationRequest {
            emails: "a@example.com, b@example.com ,, c@example.com".to_string(),
            note: None,
        };
        assert_eq!(
            request.addresses(),
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_grant_quota_request_requires_positive_amount() {
        let request = GrantQuotaRequest {
            user_id: Uuid::new_v4(),
            amount: 0,
        };
        assert_eq!(
            request.validate(),
            Some("Amount must be at least 1".to_string())
        );

        let request = GrantQuotaRequest {
            user_id: Uuid::new_v4(),
            amount: 3,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_bulk_request_empty_list_fails() {
        let request = BulkInvitationRequest {
            emails: " , ,".to_string(),
            note: None,
        };
        assert_eq!(
            request.validate(),
            Some("You did not provide any email addresses".to_string())
        );
    }
}
