//! OpenAPI document for the invitation API.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use gatehouse_api_invitations::{handlers, models, ErrorResponse};

/// API documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_invitation_handler,
        handlers::list_invitations_handler,
        handlers::remaining_invitations_handler,
        handlers::invited_handler,
        handlers::register_handler,
        handlers::bulk_invitations_handler,
        handlers::grant_quota_handler,
        handlers::sweep_invitations_handler,
    ),
    components(schemas(
        models::CreateInvitationRequest,
        models::InvitationResponse,
        models::InvitationKeySummary,
        models::RemainingResponse,
        models::InvitedResponse,
        models::BulkInvitationRequest,
        models::BulkInvitationResponse,
        models::BulkInvitationFailure,
        models::GrantQuotaRequest,
        models::GrantQuotaResponse,
        models::SweepResponse,
        models::RegisterRequest,
        models::RegisterResponse,
        ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Invitations", description = "Create invitations and check quota"),
        (name = "Registration", description = "Invitation-gated account registration"),
        (name = "Admin", description = "Bulk invitations and maintenance"),
    ),
    info(
        title = "Gatehouse API",
        description = "Invitation-gated user registration service",
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// GET /api-docs/openapi.json
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/invitations"));
        assert!(doc.paths.paths.contains_key("/register"));
        assert!(doc.paths.paths.contains_key("/invited/{token}"));
    }
}
