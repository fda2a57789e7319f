//! Invitation form validation.
//!
//! Contextual rules that the DTO-level checks cannot cover: quota,
//! self-invitation, and the block-list. Checked in order, first failure
//! wins.

use regex::Regex;

use crate::error::InvitationError;

/// Maximum length of an email address per RFC 5321.
const MAX_EMAIL_LEN: usize = 254;

/// Validate an invitation target and return the sanitized invitee email.
///
/// `remaining` is the inviter's current quota. Rules, in order:
/// 1. quota exhausted
/// 2. malformed email
/// 3. inviting yourself
/// 4. block-listed address
pub fn validate_invite(
    email: &str,
    inviter_email: &str,
    remaining: i32,
    blocklist: &[Regex],
) -> Result<String, InvitationError> {
    if remaining <= 0 {
        return Err(InvitationError::Validation(
            "Sorry, you don't have any invitations left".to_string(),
        ));
    }

    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(InvitationError::validation_field(
            "Email is required",
            "email",
        ));
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(InvitationError::validation_field(
            "Invalid email format",
            "email",
        ));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(InvitationError::validation_field(
            "Email address too long (max 254 characters)",
            "email",
        ));
    }

    if email == inviter_email.trim().to_lowercase() {
        return Err(InvitationError::Validation(
            "You can't send an invitation to yourself".to_string(),
        ));
    }

    if blocklist.iter().any(|pattern| pattern.is_match(&email)) {
        return Err(InvitationError::Validation(
            "Thanks, but there's no need to invite us!".to_string(),
        ));
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocklist() -> Vec<Regex> {
        vec![
            Regex::new(r"@ourcompany\.com$").unwrap(),
            Regex::new(r"^staff@").unwrap(),
        ]
    }

    #[test]
    fn test_valid_invite_returns_sanitized_email() {
        let result = validate_invite("  Friend@Example.COM ", "me@example.com", 3, &[]);
        assert_eq!(result.unwrap(), "friend@example.com");
    }

    #[test]
    fn test_exhausted_quota_rejected_first() {
        // Even a malformed email reports the quota error when remaining is 0.
        let result = validate_invite("not-an-email", "me@example.com", 0, &[]);
        match result {
            Err(InvitationError::Validation(msg)) => {
                assert_eq!(msg, "Sorry, you don't have any invitations left");
            }
            other => panic!("Expected quota error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_email_rejected() {
        let result = validate_invite("not-an-email", "me@example.com", 3, &[]);
        assert!(matches!(
            result,
            Err(InvitationError::ValidationField { .. })
        ));
    }

    #[test]
    fn test_self_invitation_rejected() {
        let result = validate_invite("Me@Example.com", "me@example.com", 3, &[]);
        match result {
            Err(InvitationError::Validation(msg)) => {
                assert_eq!(msg, "You can't send an invitation to yourself");
            }
            other => panic!("Expected self-invitation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blocklisted_email_rejected() {
        let result = validate_invite(
            "someone@ourcompany.com",
            "me@example.com",
            3,
            &blocklist(),
        );
        match result {
            Err(InvitationError::Validation(msg)) => {
                assert_eq!(msg, "Thanks, but there's no need to invite us!");
            }
            other => panic!("Expected block-list error, got {other:?}"),
        }
    }

    #[test]
    fn test_blocklist_prefix_pattern() {
        let result = validate_invite("staff@elsewhere.org", "me@example.com", 3, &blocklist());
        assert!(result.is_err());
    }

    #[test]
    fn test_non_blocklisted_email_passes() {
        let result = validate_invite("friend@elsewhere.org", "me@example.com", 3, &blocklist());
        assert!(result.is_ok());
    }
}
