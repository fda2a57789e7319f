//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A registered user account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,

    /// Email address (unique, stored lowercase).
    pub email: String,

    /// Argon2id password hash in PHC format.
    pub password_hash: String,

    /// Whether this user may use admin-only endpoints.
    pub is_admin: bool,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl User {
    /// Create a new user record.
    pub async fn create(pool: &PgPool, data: &CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO users (email, password_hash, is_admin)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.is_admin)
        .fetch_one(pool)
        .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = LOWER($1) LIMIT 1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
