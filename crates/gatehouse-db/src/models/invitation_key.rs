//! Invitation key model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A single invitation key.
///
/// Only the SHA-256 hash of the token is persisted; the raw token leaves
/// the system exactly once, inside the invitation email.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InvitationKey {
    /// Unique key identifier.
    pub id: Uuid,

    /// SHA-256 hex digest of the raw invitation token.
    pub token_hash: String,

    /// User who sent the invitation.
    pub from_user_id: Uuid,

    /// Remaining redemptions. Single-use keys start at 1.
    pub uses_left: i32,

    /// When the invitation was created. Expiry is measured from here.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new invitation key.
#[derive(Debug)]
pub struct CreateInvitationKey {
    pub token_hash: String,
    pub from_user_id: Uuid,
    pub uses_left: i32,
}

impl InvitationKey {
    /// Create a new invitation key record.
    pub async fn create(pool: &PgPool, data: &CreateInvitationKey) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO invitation_keys (token_hash, from_user_id, uses_left)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(&data.token_hash)
        .bind(data.from_user_id)
        .bind(data.uses_left)
        .fetch_one(pool)
        .await
    }

    /// Look up a key by its token hash.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM invitation_keys WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Find a key by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM invitation_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List keys sent by a user, newest first.
    pub async fn list_by_sender(
        pool: &PgPool,
        from_user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM invitation_keys WHERE from_user_id = $1 ORDER BY created_at DESC",
        )
        .bind(from_user_id)
        .fetch_all(pool)
        .await
    }

    /// Consume one use of this key and record the registrant.
    ///
    /// Both writes happen in a single transaction. The `uses_left > 0`
    /// guard means a key raced to exhaustion returns `None` instead of
    /// going negative.
    pub async fn mark_used(
        pool: &PgPool,
        key_id: Uuid,
        registrant_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<Self> = sqlx::query_as(
            r"
            UPDATE invitation_keys
            SET uses_left = uses_left - 1, updated_at = NOW()
            WHERE id = $1 AND uses_left > 0
            RETURNING *
            ",
        )
        .bind(key_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            r"
            INSERT INTO invitation_registrants (invitation_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (invitation_id, user_id) DO NOTHING
            ",
        )
        .bind(key_id)
        .bind(registrant_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// IDs of users who registered through this key.
    pub async fn registrants(pool: &PgPool, key_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r"
            SELECT user_id FROM invitation_registrants
            WHERE invitation_id = $1
            ORDER BY registered_at
            ",
        )
        .bind(key_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Delete all keys created at or before `cutoff`.
    ///
    /// Registrant rows go with them through the foreign-key cascade.
    /// Returns the number of deleted keys.
    pub async fn delete_expired(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invitation_keys WHERE created_at <= $1")
            .bind(cutoff)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Whether this key has reached its expiry window. A key is invalid
    /// from the moment `created_at + expiry_days` arrives.
    #[must_use]
    pub fn is_expired(&self, expiry_days: i64, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::days(expiry_days)
    }

    /// Whether this key can still be redeemed: uses remain and the expiry
    /// window has not passed.
    #[must_use]
    pub fn is_usable(&self, expiry_days: i64, now: DateTime<Utc>) -> bool {
        self.uses_left > 0 && !self.is_expired(expiry_days, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(uses_left: i32, created_at: DateTime<Utc>) -> InvitationKey {
        InvitationKey {
            id: Uuid::new_v4(),
            token_hash: "a".repeat(64),
            from_user_id: Uuid::new_v4(),
            uses_left,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn fresh_key_is_usable() {
        let now = Utc::now();
        let k = key(1, now - Duration::hours(1));
        assert!(k.is_usable(7, now));
        assert!(!k.is_expired(7, now));
    }

    #[test]
    fn key_past_window_is_expired() {
        let now = Utc::now();
        let k = key(1, now - Duration::days(8));
        assert!(k.is_expired(7, now));
        assert!(!k.is_usable(7, now));
    }

    #[test]
    fn key_at_exact_expiry_boundary_is_expired() {
        let now = Utc::now();
        let k = key(1, now - Duration::days(7));
        assert!(k.is_expired(7, now));
        assert!(!k.is_usable(7, now));
    }

    #[test]
    fn key_just_inside_window_is_usable() {
        let now = Utc::now();
        let k = key(1, now - Duration::days(7) + Duration::seconds(5));
        assert!(!k.is_expired(7, now));
        assert!(k.is_usable(7, now));
    }

    #[test]
    fn exhausted_key_is_not_usable() {
        let now = Utc::now();
        let k = key(0, now - Duration::hours(1));
        assert!(!k.is_usable(7, now));
        assert!(!k.is_expired(7, now));
    }

    #[test]
    fn multi_use_key_is_usable_until_exhausted() {
        let now = Utc::now();
        let k = key(3, now - Duration::days(1));
        assert!(k.is_usable(7, now));
    }
}
