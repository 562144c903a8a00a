// Identity and session error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ProfileError;
use crate::services::jwt::JwtError;
use crate::utils::password::PasswordError;

/// Errors surfaced by the identity flows
///
/// Each variant carries its client-facing message via `Display`; the HTTP
/// status is derived from the variant, not the call site, so the same
/// failure maps to the same status on every route.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Email already registered")]
    DuplicateEmail,

    /// Same condition as `DuplicateEmail`, raised from profile updates
    #[error("Email already in use")]
    EmailInUse,

    /// Unknown email, wrong password and passwordless account all collapse
    /// into this one variant so login leaks nothing about which failed
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Invalid verification token")]
    InvalidToken,

    #[error("Verification token has expired")]
    ExpiredToken,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden - Insufficient permissions")]
    Forbidden,

    #[error("Token generation failed: {0}")]
    TokenError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    InternalError,
}

impl AuthError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AuthError::EmailInUse => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::IncorrectPassword => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::BAD_REQUEST,
            AuthError::ExpiredToken => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server faults keep their detail in the log, not the body
        let message = if status.is_server_error() {
            tracing::error!("auth error: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ProfileError> for AuthError {
    fn from(error: ProfileError) -> Self {
        match error {
            ProfileError::NotFound => AuthError::UserNotFound,
            ProfileError::DuplicateEmail => AuthError::DuplicateEmail,
            ProfileError::Database(e) => AuthError::DatabaseError(e.to_string()),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(error: PasswordError) -> Self {
        tracing::error!("password hashing failed: {}", error);
        AuthError::InternalError
    }
}

impl From<JwtError> for AuthError {
    fn from(error: JwtError) -> Self {
        AuthError::TokenError(error.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(first_validation_message(&errors))
    }
}

/// Pull the first field message out of a validator error set
///
/// Clients get one diagnostic string per failure, matching the single
/// `{"error": ...}` body shape used everywhere else.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string())
}
