//! Runtime settings for the invitation feature.

use regex::Regex;

/// Invitation feature settings, resolved by the application at startup.
#[derive(Debug, Clone)]
pub struct InvitationSettings {
    /// When true, registration requires a valid invitation key.
    pub invite_mode: bool,

    /// Default number of invitations granted to each new user.
    pub invitations_per_user: i32,

    /// Days an invitation key stays valid after creation.
    pub expiry_days: i64,

    /// Compiled block-list patterns; invitee emails matching any of these
    /// are rejected.
    pub blocklist: Vec<Regex>,

    /// Base URL used in invitation email links.
    pub frontend_url: String,

    /// From address for invitation emails.
    pub from_email: String,
}

impl Default for InvitationSettings {
    fn default() -> Self {
        Self {
            invite_mode: true,
            invitations_per_user: 5,
            expiry_days: 7,
            blocklist: Vec::new(),
            frontend_url: "http://localhost:3000".to_string(),
            from_email: "noreply@localhost".to_string(),
        }
    }
}
