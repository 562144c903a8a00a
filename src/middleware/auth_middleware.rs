// Authentication middleware for protected routes
// Validates session tokens and injects AuthenticatedUser into request extensions

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{app::AppState, middleware::auth::AuthenticatedUser, models::UserRole};

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

/// Middleware that validates the bearer token and stores the session identity
///
/// Runs before any role gate; domain handlers only execute with a verified
/// identity in the request extensions.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return unauthorized("Unauthorized - No token provided"),
    };

    let claims = match app_state.jwt_service.verify_session(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("session token rejected: {}", e);
            return unauthorized("Unauthorized - Invalid token");
        },
    };

    // A verified signature with an unparseable subject is still unusable
    let profile_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("session token carried malformed subject");
            return unauthorized("Unauthorized - Invalid token");
        },
    };

    let auth_user = AuthenticatedUser {
        profile_id,
        email: claims.email,
        role: claims.role,
        token_id: claims.jti,
        exp: claims.exp,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Role gate for the brand and clipper route groups
///
/// Runs after `auth_middleware`, so the extension is already present on any
/// authenticated request that reaches it.
pub async fn require_role(request: Request<Body>, next: Next, required: UserRole) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.role == required => next.run(request).await,
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Forbidden - Insufficient permissions" })),
        )
            .into_response(),
        None => unauthorized("Unauthorized - No token provided"),
    }
}
