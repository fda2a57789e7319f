//! Handlers for creating invitations and checking the remaining quota.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use gatehouse_auth::JwtClaims;
use gatehouse_db::models::User;

use crate::error::{ErrorResponse, InvitationError};
use crate::models::{
    CreateInvitationRequest, InvitationKeySummary, InvitationResponse, RemainingResponse,
};
use crate::router::AppState;
use crate::services::validate_invite;

/// POST /invitations
///
/// Create a single-use invitation key and email it to the invitee.
/// Spends one unit of the caller's quota.
#[utoipa::path(
    post,
    path = "/invitations",
    request_body = CreateInvitationRequest,
    responses(
        (status = 201, description = "Invitation created and emailed", body = InvitationResponse),
        (status = 400, description = "Validation error or quota exhausted", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Email dispatch failed", body = ErrorResponse),
    ),
    tag = "Invitations",
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn create_invitation_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), InvitationError> {
    if let Some(error) = request.validate() {
        return Err(InvitationError::Validation(error));
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| InvitationError::Unauthorized("Invalid user ID in claims".to_string()))?;

    let inviter = User::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| InvitationError::Unauthorized("Unknown user".to_string()))?;

    let remaining = state.invitation_service.remaining_invitations(user_id).await?;

    let email = validate_invite(
        &request.email,
        &inviter.email,
        remaining,
        &state.settings.blocklist,
    )?;

    let (key, raw_token) = state.invitation_service.create_invitation(user_id).await?;

    if let Err(e) = state
        .invitation_service
        .send_invitation(&raw_token, &email, &inviter, request.note.as_deref())
        .await
    {
        // The email never went out, so the invitation goes back.
        state.invitation_service.refund_invitation(user_id).await?;
        return Err(e);
    }

    let remaining = state.invitation_service.remaining_invitations(user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse {
            id: key.id,
            email,
            created_at: key.created_at,
            remaining,
        }),
    ))
}

/// GET /invitations
///
/// List the invitations the caller has sent, newest first.
#[utoipa::path(
    get,
    path = "/invitations",
    responses(
        (status = 200, description = "Invitations sent by the caller", body = [InvitationKeySummary]),
        (status = 401, description = "Unauthorized"),
    ),
    tag = "Invitations",
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn list_invitations_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<Vec<InvitationKeySummary>>, InvitationError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| InvitationError::Unauthorized("Invalid user ID in claims".to_string()))?;

    let now = Utc::now();
    let keys = state.invitation_service.list_invitations(user_id).await?;

    Ok(Json(
        keys.into_iter()
            .map(|key| InvitationKeySummary {
                id: key.id,
                uses_left: key.uses_left,
                created_at: key.created_at,
                usable: key.is_usable(state.settings.expiry_days, now),
            })
            .collect(),
    ))
}

/// GET /invitations/remaining
///
/// How many invitations the caller has left to send.
#[utoipa::path(
    get,
    path = "/invitations/remaining",
    responses(
        (status = 200, description = "Remaining invitation count", body = RemainingResponse),
        (status = 401, description = "Unauthorized"),
    ),
    tag = "Invitations",
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn remaining_invitations_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<RemainingResponse>, InvitationError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| InvitationError::Unauthorized("Invalid user ID in claims".to_string()))?;

    let remaining = state.invitation_service.remaining_invitations(user_id).await?;

    Ok(Json(RemainingResponse { remaining }))
}

#[cfg(test)]
mod tests {
    use crate::models::CreateInvitationRequest;

    #[test]
    fn test_create_invitation_request_validation_passes() {
        let request = CreateInvitationRequest {
            email: "friend@example.com".to_string(),
            note: Some("Come join us".to_string()),
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_create_invitation_request_invalid_email_fails() {
        let request = CreateInvitationRequest {
            email: "nope".to_string(),
            note: None,
        };
        assert!(request.validate().is_some());
    }
}
