// Authentication handlers: registration, login, email verification, profile

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::UserRole,
    services::AuthService,
    utils::{first_validation_message, AuthError},
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub role: UserRole,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

// =============================================================================
// AUTH HANDLERS
// =============================================================================

/// Register a new account
/// POST /auth/register
///
/// Returns the profile, a session token, and the email verification token.
pub async fn register(
    State(state): State<AppState>,
    Json(mut register_req): Json<RegisterRequest>,
) -> impl IntoResponse {
    register_req.email = register_req.email.trim().to_lowercase();

    if let Err(errors) = register_req.validate() {
        return AuthError::ValidationError(first_validation_message(&errors)).into_response();
    }

    let auth_service = AuthService::new(&state);

    match auth_service
        .register(
            &register_req.email,
            &register_req.password,
            register_req.role,
        )
        .await
    {
        Ok(registered) => (
            StatusCode::CREATED,
            Json(json!({
                "user": registered.profile.to_response(),
                "token": registered.session_token,
                "verification_token": registered.verification_token,
            })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Log in with email and password
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(mut login_req): Json<LoginRequest>,
) -> impl IntoResponse {
    login_req.email = login_req.email.trim().to_lowercase();

    if let Err(errors) = login_req.validate() {
        return AuthError::ValidationError(first_validation_message(&errors)).into_response();
    }

    let auth_service = AuthService::new(&state);

    match auth_service
        .login(&login_req.email, &login_req.password)
        .await
    {
        Ok((profile, token)) => Json(json!({
            "user": profile.to_response(),
            "token": token,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Consume an email verification token
/// POST /auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(verify_req): Json<VerifyEmailRequest>,
) -> impl IntoResponse {
    if let Err(errors) = verify_req.validate() {
        return AuthError::ValidationError(first_validation_message(&errors)).into_response();
    }

    let auth_service = AuthService::new(&state);

    match auth_service.verify_email(&verify_req.token).await {
        Ok(()) => Json(json!({ "message": "Email verified successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Change the authenticated account's password
/// POST /auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(change_req): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    if let Err(errors) = change_req.validate() {
        return AuthError::ValidationError(first_validation_message(&errors)).into_response();
    }

    let auth_service = AuthService::new(&state);

    match auth_service
        .change_password(
            user.profile_id,
            &change_req.current_password,
            &change_req.new_password,
        )
        .await
    {
        Ok(()) => Json(json!({ "message": "Password changed successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Fetch the authenticated profile
/// GET /auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let auth_service = AuthService::new(&state);

    match auth_service.get_profile(user.profile_id).await {
        Ok(profile) => Json(json!({ "user": profile.to_response() })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Update the authenticated profile (email only)
/// PATCH /auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(mut update_req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if let Some(email) = update_req.email.as_mut() {
        *email = email.trim().to_lowercase();
    }

    if let Err(errors) = update_req.validate() {
        return AuthError::ValidationError(first_validation_message(&errors)).into_response();
    }

    let auth_service = AuthService::new(&state);

    match auth_service
        .update_profile(user.profile_id, update_req.email)
        .await
    {
        Ok(profile) => Json(json!({ "user": profile.to_response() })).into_response(),
        Err(error) => error.into_response(),
    }
}
