//! Router configuration for the invitation API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use sqlx::PgPool;

use crate::handlers::{
    bulk_invitations_handler, create_invitation_handler, grant_quota_handler, invited_handler,
    list_invitations_handler, register_handler, remaining_invitations_handler,
    sweep_invitations_handler,
};
use crate::middleware::{jwt_auth_middleware, JwtPublicKey};
use crate::services::{InvitationService, RegistrationBackend};
use crate::settings::InvitationSettings;

/// Application state for the invitation API.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,
    /// Resolved invitation settings.
    pub settings: Arc<InvitationSettings>,
    /// Invitation key lifecycle service.
    pub invitation_service: Arc<InvitationService>,
    /// Strategy for creating user accounts.
    pub registration_backend: Arc<dyn RegistrationBackend>,
}

/// Create the invitation API router.
///
/// Public routes:
/// - GET /invited/{token} - Invitation email landing endpoint
/// - POST /register - Invitation-gated registration
///
/// Authenticated routes (bearer token):
/// - POST /invitations - Create and email an invitation
/// - GET /invitations - List invitations sent by the caller
/// - GET /invitations/remaining - Remaining quota
///
/// Admin routes (bearer token with "admin" role):
/// - POST /admin/invitations/bulk - Invite a list of addresses
/// - POST /admin/invitations/quota - Grant extra invitations to a user
/// - POST /admin/invitations/sweep - Delete expired keys
pub fn invitation_router(state: AppState, jwt_public_key: String) -> Router {
    let public = Router::new()
        .route("/invited/:token", get(invited_handler))
        .route("/register", post(register_handler));

    let protected = Router::new()
        .route(
            "/invitations",
            post(create_invitation_handler).get(list_invitations_handler),
        )
        .route("/invitations/remaining", get(remaining_invitations_handler))
        .route("/admin/invitations/bulk", post(bulk_invitations_handler))
        .route("/admin/invitations/quota", post(grant_quota_handler))
        .route("/admin/invitations/sweep", post(sweep_invitations_handler))
        .layer(middleware::from_fn(jwt_auth_middleware))
        .layer(Extension(JwtPublicKey(jwt_public_key)));

    public.merge(protected).with_state(state)
}
