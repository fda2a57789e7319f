//! JWT claims structure with standard and custom claims.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims containing standard and custom claims.
///
/// # Standard Claims (RFC 7519)
///
/// - `sub`: Subject (the user ID)
/// - `iss`: Issuer
/// - `aud`: Audience
/// - `exp`: Expiration time (Unix timestamp)
/// - `iat`: Issued at (Unix timestamp)
/// - `jti`: JWT ID (unique identifier)
///
/// # Custom Claims
///
/// - `email`: The user's email address
/// - `roles`: Role names for authorization (e.g. "admin")
///
/// # Example
///
/// ```rust
/// use gatehouse_auth::JwtClaims;
///
/// let claims = JwtClaims::builder()
///     .subject("user-123")
///     .issuer("gatehouse")
///     .roles(vec!["admin"])
///     .expires_in_secs(3600)
///     .build();
///
/// assert_eq!(claims.sub, "user-123");
/// assert!(claims.has_role("admin"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    /// Subject - the user ID.
    pub sub: String,

    /// Issuer - who created the token.
    pub iss: String,

    /// Audience - intended recipients.
    #[serde(default)]
    pub aud: Vec<String>,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Issued at as Unix timestamp.
    pub iat: i64,

    /// JWT ID - unique identifier for this token.
    pub jti: String,

    /// User email address (optional, included in user tokens).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User roles for authorization.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl JwtClaims {
    /// Create a builder for constructing claims.
    #[must_use]
    pub fn builder() -> JwtClaimsBuilder {
        JwtClaimsBuilder::default()
    }

    /// Parse the subject as a user UUID.
    ///
    /// Returns `None` if the subject is not a valid UUID.
    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.sub.parse().ok()
    }

    /// Check whether the claims carry a given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check whether the token is expired relative to now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Builder for [`JwtClaims`].
#[derive(Debug, Default)]
pub struct JwtClaimsBuilder {
    sub: Option<String>,
    iss: Option<String>,
    aud: Vec<String>,
    exp: Option<i64>,
    email: Option<String>,
    roles: Vec<String>,
}

impl JwtClaimsBuilder {
    /// Set the subject (user ID).
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the issuer.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set the audience.
    #[must_use]
    pub fn audience(mut self, aud: Vec<impl Into<String>>) -> Self {
        self.aud = aud.into_iter().map(Into::into).collect();
        self
    }

    /// Set the user email.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the roles.
    #[must_use]
    pub fn roles(mut self, roles: Vec<impl Into<String>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Set an absolute expiration timestamp.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration relative to now.
    #[must_use]
    pub fn expires_in_secs(mut self, secs: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(secs)).timestamp());
        self
    }

    /// Build the claims. Missing fields get safe defaults.
    #[must_use]
    pub fn build(self) -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: self.sub.unwrap_or_default(),
            iss: self.iss.unwrap_or_else(|| "gatehouse".to_string()),
            aud: self.aud,
            exp: self
                .exp
                .unwrap_or_else(|| (now + Duration::hours(1)).timestamp()),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            email: self.email,
            roles: self.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let claims = JwtClaims::builder().subject("user-1").build();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "gatehouse");
        assert!(!claims.jti.is_empty());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_user_id_parses_uuid() {
        let id = Uuid::new_v4();
        let claims = JwtClaims::builder().subject(id.to_string()).build();

        assert_eq!(claims.user_id(), Some(id));
    }

    #[test]
    fn test_user_id_rejects_non_uuid() {
        let claims = JwtClaims::builder().subject("not-a-uuid").build();

        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn test_has_role() {
        let claims = JwtClaims::builder()
            .subject("user-1")
            .roles(vec!["admin", "member"])
            .build();

        assert!(claims.has_role("admin"));
        assert!(claims.has_role("member"));
        assert!(!claims.has_role("superuser"));
    }

    #[test]
    fn test_expiration_in_past_is_expired() {
        let claims = JwtClaims::builder()
            .subject("user-1")
            .expiration(Utc::now().timestamp() - 60)
            .build();

        assert!(claims.is_expired());
    }

    #[test]
    fn test_unique_jti_per_token() {
        let a = JwtClaims::builder().subject("u").build();
        let b = JwtClaims::builder().subject("u").build();

        assert_ne!(a.jti, b.jti);
    }
}
