//! JWT authentication middleware.
//!
//! Extracts and validates the bearer token from the Authorization header,
//! then inserts `JwtClaims` into the request extensions for handlers.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use gatehouse_auth::decode_token;

/// Wrapper for the JWT verification key so it can live in extensions.
#[derive(Clone)]
pub struct JwtPublicKey(pub String);

/// JWT authentication middleware.
///
/// # Usage
///
/// ```rust,ignore
/// use axum::{middleware, routing::post, Extension, Router};
/// use gatehouse_api_invitations::middleware::{jwt_auth_middleware, JwtPublicKey};
///
/// let router = Router::new()
///     .route("/invitations", post(create_invitation_handler))
///     .layer(middleware::from_fn(jwt_auth_middleware))
///     .layer(Extension(JwtPublicKey(public_key_pem)));
/// ```
pub async fn jwt_auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let public_key = request
        .extensions()
        .get::<JwtPublicKey>()
        .ok_or_else(|| {
            tracing::error!("JWT public key not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error",
            )
                .into_response()
        })?
        .0
        .clone();

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response()
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format",
        )
            .into_response()
    })?;

    // Reject empty bearer tokens before attempting JWT decode.
    if token.is_empty() {
        tracing::warn!("Rejected empty bearer token");
        return Err((StatusCode::UNAUTHORIZED, "Empty bearer token").into_response());
    }

    let claims = decode_token(token, public_key.as_bytes()).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response()
    })?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_public_key_wrapper() {
        let key = JwtPublicKey("test-key".to_string());
        assert_eq!(key.0, "test-key");
    }

    #[test]
    fn test_bearer_prefix_stripping() {
        let header = "Bearer abc.def.ghi";
        assert_eq!(header.strip_prefix("Bearer "), Some("abc.def.ghi"));
        assert_eq!("Basic abc".strip_prefix("Bearer "), None);
    }
}
