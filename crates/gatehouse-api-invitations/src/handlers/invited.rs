//! Handler for the invitation landing endpoint.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::error::{ErrorResponse, InvitationError};
use crate::models::InvitedResponse;
use crate::router::AppState;

/// GET /invited/{token}
///
/// Landing endpoint for invitation email links. With invite-only mode
/// disabled the key is irrelevant and the client is redirected to the
/// frontend registration page. With it enabled, a usable key is echoed
/// back for the registration form; anything else is 410 Gone.
#[utoipa::path(
    get,
    path = "/invited/{token}",
    params(
        ("token" = String, Path, description = "Invitation key from the email link")
    ),
    responses(
        (status = 200, description = "Key is valid", body = InvitedResponse),
        (status = 307, description = "Invite-only mode disabled, proceed to the frontend registration page"),
        (status = 410, description = "Key is unknown, exhausted, or expired", body = ErrorResponse),
    ),
    tag = "Invitations"
)]
pub async fn invited_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, InvitationError> {
    if !state.settings.invite_mode {
        let register_url = format!(
            "{}/register",
            state.settings.frontend_url.trim_end_matches('/')
        );
        return Ok(Redirect::temporary(&register_url).into_response());
    }

    if state.invitation_service.find_usable(&token).await?.is_none() {
        return Err(InvitationError::InvalidKey(
            "The invitation key is not valid".to_string(),
        ));
    }

    Ok(Json(InvitedResponse {
        invitation_key: token,
        valid: true,
    })
    .into_response())
}
