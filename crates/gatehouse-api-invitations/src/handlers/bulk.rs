//! Admin handlers: bulk invitations and the expiry sweep.

use axum::{extract::State, http::StatusCode, Extension, Json};

use gatehouse_auth::JwtClaims;
use gatehouse_db::models::User;

use crate::error::{ErrorResponse, InvitationError};
use crate::models::{
    BulkInvitationFailure, BulkInvitationRequest, BulkInvitationResponse, GrantQuotaRequest,
    GrantQuotaResponse, SweepResponse,
};
use crate::router::AppState;
use crate::services::validate_invite;

fn require_admin(claims: &JwtClaims) -> Result<(), InvitationError> {
    if claims.has_role("admin") {
        Ok(())
    } else {
        Err(InvitationError::Forbidden(
            "Administrator access required".to_string(),
        ))
    }
}

/// Per-address skip message for the bulk dispatch. Returns `None` for
/// errors that should fail the whole request instead.
fn skip_reason(error: &InvitationError) -> Option<String> {
    match error {
        InvitationError::Validation(msg) => Some(msg.clone()),
        InvitationError::ValidationField { message, .. } => Some(message.clone()),
        InvitationError::Email(_) => Some("Failed to send invitation email".to_string()),
        _ => None,
    }
}

/// POST /admin/invitations/bulk
///
/// Create and email one single-use invitation key per address in a
/// comma-separated list. Each key spends one unit of the caller's quota.
/// Addresses that fail validation or dispatch are skipped and reported,
/// the rest still go out.
#[utoipa::path(
    post,
    path = "/admin/invitations/bulk",
    request_body = BulkInvitationRequest,
    responses(
        (status = 200, description = "Invitations dispatched", body = BulkInvitationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
    ),
    tag = "Admin",
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn bulk_invitations_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
    Json(request): Json<BulkInvitationRequest>,
) -> Result<Json<BulkInvitationResponse>, InvitationError> {
    require_admin(&claims)?;

    if let Some(error) = request.validate() {
        return Err(InvitationError::Validation(error));
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| InvitationError::Unauthorized("Invalid user ID in claims".to_string()))?;

    let inviter = User::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| InvitationError::Unauthorized("Unknown user".to_string()))?;

    let mut recipients = Vec::new();
    let mut failed = Vec::new();

    for address in request.addresses() {
        let remaining = state.invitation_service.remaining_invitations(user_id).await?;

        let email = match validate_invite(
            address,
            &inviter.email,
            remaining,
            &state.settings.blocklist,
        ) {
            Ok(email) => email,
            Err(e) => match skip_reason(&e) {
                Some(message) => {
                    failed.push(BulkInvitationFailure {
                        email: address.to_string(),
                        message,
                    });
                    continue;
                }
                None => return Err(e),
            },
        };

        let (_key, raw_token) = match state.invitation_service.create_invitation(user_id).await {
            Ok(created) => created,
            Err(e) => match skip_reason(&e) {
                Some(message) => {
                    failed.push(BulkInvitationFailure {
                        email: address.to_string(),
                        message,
                    });
                    continue;
                }
                None => return Err(e),
            },
        };

        if let Err(e) = state
            .invitation_service
            .send_invitation(&raw_token, &email, &inviter, request.note.as_deref())
            .await
        {
            // The email never went out, so the invitation goes back.
            state.invitation_service.refund_invitation(user_id).await?;
            match skip_reason(&e) {
                Some(message) => {
                    failed.push(BulkInvitationFailure {
                        email: address.to_string(),
                        message,
                    });
                    continue;
                }
                None => return Err(e),
            }
        }

        recipients.push(email);
    }

    tracing::info!(
        from_user = %user_id,
        sent = recipients.len(),
        failed = failed.len(),
        "Bulk invitations dispatched"
    );

    Ok(Json(BulkInvitationResponse {
        sent: recipients.len(),
        recipients,
        failed,
    }))
}

/// POST /admin/invitations/quota
///
/// Grant extra invitations to a user.
#[utoipa::path(
    post,
    path = "/admin/invitations/quota",
    request_body = GrantQuotaRequest,
    responses(
        (status = 200, description = "Quota granted", body = GrantQuotaResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    tag = "Admin",
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn grant_quota_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
    Json(request): Json<GrantQuotaRequest>,
) -> Result<Json<GrantQuotaResponse>, InvitationError> {
    require_admin(&claims)?;

    if let Some(error) = request.validate() {
        return Err(InvitationError::Validation(error));
    }

    if User::find_by_id(&state.pool, request.user_id).await?.is_none() {
        return Err(InvitationError::NotFound("User not found".to_string()));
    }

    let remaining = state
        .invitation_service
        .grant_invitations(request.user_id, request.amount)
        .await?;

    Ok(Json(GrantQuotaResponse {
        user_id: request.user_id,
        remaining,
    }))
}

/// POST /admin/invitations/sweep
///
/// Delete all invitation keys past the expiry window.
#[utoipa::path(
    post,
    path = "/admin/invitations/sweep",
    responses(
        (status = 200, description = "Sweep completed", body = SweepResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
    ),
    tag = "Admin",
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn sweep_invitations_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<SweepResponse>, InvitationError> {
    require_admin(&claims)?;

    let deleted = state.invitation_service.sweep_expired().await?;

    Ok(Json(SweepResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_roles(roles: Vec<&str>) -> JwtClaims {
        JwtClaims::builder()
            .subject("3a0f2a1e-5b8c-4c4d-9e1f-000000000001")
            .issuer("gatehouse")
            .roles(roles)
            .expires_in_secs(3600)
            .build()
    }

    #[test]
    fn test_admin_role_passes() {
        assert!(require_admin(&claims_with_roles(vec!["admin"])).is_ok());
    }

    #[test]
    fn test_missing_admin_role_forbidden() {
        let result = require_admin(&claims_with_roles(vec!["member"]));
        assert!(matches!(result, Err(InvitationError::Forbidden(_))));
    }

    #[test]
    fn test_validation_errors_skip_the_address() {
        let reason =
            skip_reason(&InvitationError::Validation("no good".to_string()));
        assert_eq!(reason, Some("no good".to_string()));

        let reason = skip_reason(&InvitationError::validation_field(
            "Invalid email format",
            "email",
        ));
        assert_eq!(reason, Some("Invalid email format".to_string()));
    }

    #[test]
    fn test_hard_errors_fail_the_batch() {
        assert_eq!(
            skip_reason(&InvitationError::Database("down".to_string())),
            None
        );
        assert_eq!(
            skip_reason(&InvitationError::Unauthorized("no".to_string())),
            None
        );
    }
}
