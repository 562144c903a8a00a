// Campaign and participation error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::DatabaseErrorKind;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the campaign and participation flows
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    ValidationError(String),

    /// Also covers ownership mismatches on mutations: a campaign owned by
    /// another brand reads the same as one that does not exist
    #[error("Campaign not found")]
    CampaignNotFound,

    /// Ownership probe failure on the participants listing
    #[error("Campaign not found or unauthorized")]
    CampaignNotOwned,

    #[error("Campaign is not active")]
    CampaignInactive,

    #[error("You have already participated in this campaign")]
    AlreadyParticipated,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    InternalError,
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ServiceError::CampaignNotFound => StatusCode::NOT_FOUND,
            ServiceError::CampaignNotOwned => StatusCode::NOT_FOUND,
            ServiceError::CampaignInactive => StatusCode::BAD_REQUEST,
            ServiceError::AlreadyParticipated => StatusCode::BAD_REQUEST,
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server faults keep their detail in the log, not the body
        let message = if status.is_server_error() {
            tracing::error!("service error: {:?}", self);
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

// Conversion from various error types
impl From<diesel::result::Error> for ServiceError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => ServiceError::CampaignNotFound,
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ServiceError::AlreadyParticipated
            },
            _ => ServiceError::DatabaseError(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(crate::utils::auth_errors::first_validation_message(&errors))
    }
}
