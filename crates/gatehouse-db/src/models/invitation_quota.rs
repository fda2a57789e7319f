//! Per-user invitation quota model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// The number of invitations a user has left to send.
///
/// One row per user, created lazily the first time the quota is consulted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InvitationQuota {
    /// Owning user.
    pub user_id: Uuid,

    /// Invitations remaining. Never negative.
    pub remaining: i32,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl InvitationQuota {
    /// Fetch the quota row for a user, creating it with `default_remaining`
    /// if it does not exist yet.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: Uuid,
        default_remaining: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO invitation_quotas (user_id, remaining)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(default_remaining)
        .fetch_one(pool)
        .await
    }

    /// Atomically consume one invitation from the user's quota.
    ///
    /// Returns the updated row, or `None` when the quota was already
    /// exhausted. The `remaining > 0` guard makes concurrent decrements
    /// safe: only one of two racing requests can take the last invitation.
    pub async fn try_decrement(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE invitation_quotas
            SET remaining = remaining - 1, updated_at = NOW()
            WHERE user_id = $1 AND remaining > 0
            RETURNING *
            ",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Restore one invitation to the user's quota.
    ///
    /// Used to refund a consumed invitation when sending the email fails
    /// after the quota was already decremented.
    pub async fn increment(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE invitation_quotas
            SET remaining = remaining + 1, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            ",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Add `amount` invitations to a user's quota, creating the row first
    /// if needed. Admin-facing.
    pub async fn add_remaining(
        pool: &PgPool,
        user_id: Uuid,
        amount: i32,
        default_remaining: i32,
    ) -> Result<Self, sqlx::Error> {
        Self::get_or_create(pool, user_id, default_remaining).await?;

        sqlx::query_as(
            r"
            UPDATE invitation_quotas
            SET remaining = remaining + $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(pool)
        .await
    }
}
