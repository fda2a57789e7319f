//! Account creation behind the invitation gate.
//!
//! `RegistrationBackend` is a strategy trait so deployments can swap how
//! accounts are created (the default stores users locally; another
//! backend might call out to an identity provider). The handler layer
//! only decides whether registration is allowed.

use async_trait::async_trait;
use sqlx::PgPool;

use gatehouse_db::models::{CreateUser, InvitationQuota, User};

use crate::error::InvitationError;

/// Creates user accounts once the invitation gate has been passed.
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    /// Register a new account. `email` is already sanitized by the
    /// caller.
    async fn register(&self, email: &str, password: &str) -> Result<User, InvitationError>;
}

/// Default backend: Argon2id-hashed credentials in the local users
/// table, with the invitation quota record created alongside the user.
pub struct DefaultRegistrationBackend {
    pool: PgPool,
    default_quota: i32,
}

impl DefaultRegistrationBackend {
    pub fn new(pool: PgPool, default_quota: i32) -> Self {
        Self {
            pool,
            default_quota,
        }
    }
}

#[async_trait]
impl RegistrationBackend for DefaultRegistrationBackend {
    async fn register(&self, email: &str, password: &str) -> Result<User, InvitationError> {
        let email = email.trim().to_lowercase();

        if User::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(InvitationError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = gatehouse_auth::hash_password(password)
            .map_err(|e| InvitationError::internal(format!("Failed to hash password: {e}")))?;

        let user = User::create(
            &self.pool,
            &CreateUser {
                email: email.clone(),
                password_hash,
                is_admin: false,
            },
        )
        .await?;

        // New users get their invitation quota up front so the first
        // quota read never races with a concurrent decrement.
        InvitationQuota::get_or_create(&self.pool, user.id, self.default_quota).await?;

        tracing::info!(user_id = %user.id, email = %email, "User registered");

        Ok(user)
    }
}
