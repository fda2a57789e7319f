//! Invitation key lifecycle.
//!
//! Key creation spends the inviter's quota, the raw token is returned
//! exactly once for the email link, and only its SHA-256 hash is
//! persisted.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use gatehouse_db::models::{CreateInvitationKey, InvitationKey, InvitationQuota, User};

use crate::error::InvitationError;
use crate::services::EmailSender;
use crate::settings::InvitationSettings;

/// Generate a cryptographically secure invitation token.
///
/// 32 bytes of random data encoded as URL-safe base64 (no padding),
/// giving 256-bit entropy in a link-safe string.
fn generate_invitation_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a token using SHA-256.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Invitation key lifecycle service.
///
/// Creates, validates, consumes, and sweeps invitation keys, and
/// dispatches the invitation email through the injected sender.
#[derive(Clone)]
pub struct InvitationService {
    pool: PgPool,
    settings: Arc<InvitationSettings>,
    email_sender: Arc<dyn EmailSender>,
}

impl InvitationService {
    /// Create a new invitation service.
    pub fn new(
        pool: PgPool,
        settings: Arc<InvitationSettings>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            pool,
            settings,
            email_sender,
        }
    }

    /// Create a single-use invitation key, spending one unit of the
    /// inviter's quota.
    ///
    /// Returns the key record and the raw token for the email link. The
    /// quota decrement is guarded (`remaining > 0`), so two racing
    /// requests cannot both take the last invitation.
    pub async fn create_invitation(
        &self,
        inviter_id: Uuid,
    ) -> Result<(InvitationKey, String), InvitationError> {
        InvitationQuota::get_or_create(&self.pool, inviter_id, self.settings.invitations_per_user)
            .await?;

        let quota = InvitationQuota::try_decrement(&self.pool, inviter_id)
            .await?
            .ok_or_else(|| {
                InvitationError::Validation(
                    "Sorry, you don't have any invitations left".to_string(),
                )
            })?;

        let raw_token = generate_invitation_token();
        let key = InvitationKey::create(
            &self.pool,
            &CreateInvitationKey {
                token_hash: hash_token(&raw_token),
                from_user_id: inviter_id,
                uses_left: 1,
            },
        )
        .await?;

        tracing::info!(
            key_id = %key.id,
            from_user = %inviter_id,
            remaining = quota.remaining,
            "Invitation key created"
        );

        Ok((key, raw_token))
    }

    /// Create a key redeemable `uses` times, from a caller-supplied raw
    /// token. Spends one unit of the inviter's quota regardless of the
    /// use count.
    pub async fn create_bulk_invitation(
        &self,
        inviter_id: Uuid,
        raw_token: &str,
        uses: i32,
    ) -> Result<InvitationKey, InvitationError> {
        if uses < 1 {
            return Err(InvitationError::Validation(
                "Use count must be at least 1".to_string(),
            ));
        }

        InvitationQuota::get_or_create(&self.pool, inviter_id, self.settings.invitations_per_user)
            .await?;

        InvitationQuota::try_decrement(&self.pool, inviter_id)
            .await?
            .ok_or_else(|| {
                InvitationError::Validation(
                    "Sorry, you don't have any invitations left".to_string(),
                )
            })?;

        let key = InvitationKey::create(
            &self.pool,
            &CreateInvitationKey {
                token_hash: hash_token(raw_token),
                from_user_id: inviter_id,
                uses_left: uses,
            },
        )
        .await?;

        tracing::info!(
            key_id = %key.id,
            from_user = %inviter_id,
            uses = uses,
            "Bulk invitation key created"
        );

        Ok(key)
    }

    /// Whether the token maps to a usable key. Unknown tokens yield
    /// `false`, never an error.
    pub async fn is_key_valid(&self, token: &str) -> Result<bool, InvitationError> {
        Ok(self.find_usable(token).await?.is_some())
    }

    /// Look up a key by raw token, returning it only if it can still be
    /// redeemed.
    pub async fn find_usable(
        &self,
        token: &str,
    ) -> Result<Option<InvitationKey>, InvitationError> {
        let key = InvitationKey::find_by_token_hash(&self.pool, &hash_token(token)).await?;

        Ok(key.filter(|k| k.is_usable(self.settings.expiry_days, Utc::now())))
    }

    /// Consume one use of a key and record the registrant.
    pub async fn mark_used(
        &self,
        key: &InvitationKey,
        registrant_id: Uuid,
    ) -> Result<(), InvitationError> {
        let updated = InvitationKey::mark_used(&self.pool, key.id, registrant_id)
            .await?
            .ok_or_else(|| {
                InvitationError::InvalidKey("The invitation key is not valid".to_string())
            })?;

        tracing::info!(
            key_id = %key.id,
            registrant = %registrant_id,
            uses_left = updated.uses_left,
            "Invitation key consumed"
        );

        Ok(())
    }

    /// Delete all keys past the expiry window, redeemed or not. Returns
    /// the number deleted.
    pub async fn sweep_expired(&self) -> Result<u64, InvitationError> {
        let cutoff = Utc::now() - Duration::days(self.settings.expiry_days);
        let deleted = InvitationKey::delete_expired(&self.pool, cutoff).await?;

        tracing::info!(deleted = deleted, "Expired invitation keys swept");

        Ok(deleted)
    }

    /// Give an invitation back to the inviter's quota.
    ///
    /// Called when email dispatch fails after the quota was already spent.
    /// The orphaned key stays unredeemed and is removed by the sweep.
    pub async fn refund_invitation(&self, user_id: Uuid) -> Result<(), InvitationError> {
        InvitationQuota::increment(&self.pool, user_id).await?;

        tracing::info!(user_id = %user_id, "Invitation refunded");

        Ok(())
    }

    /// Keys sent by a user, newest first.
    pub async fn list_invitations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InvitationKey>, InvitationError> {
        Ok(InvitationKey::list_by_sender(&self.pool, user_id).await?)
    }

    /// Grant extra invitations to a user's quota.
    pub async fn grant_invitations(
        &self,
        user_id: Uuid,
        amount: i32,
    ) -> Result<i32, InvitationError> {
        let quota = InvitationQuota::add_remaining(
            &self.pool,
            user_id,
            amount,
            self.settings.invitations_per_user,
        )
        .await?;

        tracing::info!(user_id = %user_id, amount = amount, remaining = quota.remaining, "Invitation quota granted");

        Ok(quota.remaining)
    }

    /// The inviter's remaining quota, creating the quota record with the
    /// configured default on first read.
    pub async fn remaining_invitations(&self, user_id: Uuid) -> Result<i32, InvitationError> {
        let quota = InvitationQuota::get_or_create(
            &self.pool,
            user_id,
            self.settings.invitations_per_user,
        )
        .await?;

        Ok(quota.remaining)
    }

    /// Compose and dispatch the invitation email for a freshly created
    /// key.
    pub async fn send_invitation(
        &self,
        raw_token: &str,
        email: &str,
        inviter: &User,
        note: Option<&str>,
    ) -> Result<(), InvitationError> {
        let link = format!(
            "{}/invited/{}",
            self.settings.frontend_url.trim_end_matches('/'),
            raw_token
        );

        let subject = format!("{} has invited you to join", inviter.email);

        let mut body = format!(
            "Hello,\n\n\
             {inviter} has invited you to create an account.\n\n\
             Follow this link to register:\n\n\
             {link}\n\n\
             The invitation expires in {days} days.\n",
            inviter = inviter.email,
            link = link,
            days = self.settings.expiry_days,
        );

        if let Some(note) = note {
            if !note.trim().is_empty() {
                body.push_str(&format!("\nA note from your inviter:\n\n{}\n", note.trim()));
            }
        }

        self.email_sender
            .send(&self.settings.from_email, email, &subject, &body)
            .await
            .map_err(|e| InvitationError::Email(e.to_string()))?;

        tracing::info!(to = %email, from_user = %inviter.id, "Invitation email sent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invitation_token_length() {
        let token = generate_invitation_token();
        // 32 bytes in URL-safe base64 = 43 characters
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn test_generate_invitation_token_uniqueness() {
        let token1 = generate_invitation_token();
        let token2 = generate_invitation_token();
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_invitation_token();
        // URL-safe base64 uses A-Z, a-z, 0-9, -, _
        assert!(token
            .chars()
            .all(|c| { c.is_ascii_alphanumeric() || c == '-' || c == '_' }));
    }

    #[test]
    fn test_hash_token_consistency() {
        let token = "test-token-123";
        let hash1 = hash_token(token);
        let hash2 = hash_token(token);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_token_different_inputs() {
        let hash1 = hash_token("token1");
        let hash2 = hash_token("token2");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_token_is_sha256_hex() {
        let hash = hash_token("anything");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
