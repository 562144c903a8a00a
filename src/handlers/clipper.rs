// Clipper handlers: campaign discovery, participation, dashboard

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    services::{CampaignService, ParticipationService},
};

// =============================================================================
// CLIPPER HANDLERS
// =============================================================================

/// Clipper dashboard with live participation aggregates
/// GET /clipper/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let participation_service = ParticipationService::new(&state);

    match participation_service
        .clipper_dashboard_counts(user.profile_id)
        .await
    {
        Ok(counts) => Json(json!({
            "message": format!("Welcome to Clipper dashboard, {}", user.email),
            "data": counts,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// List all active campaigns across brands
/// GET /clipper/campaigns
pub async fn list_active_campaigns(State(state): State<AppState>) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service.list_active().await {
        Ok(campaigns) => Json(json!({ "campaigns": campaigns })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Join an active campaign as the authenticated clipper
/// POST /clipper/campaigns/{id}/participate
pub async fn participate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(campaign_id): Path<Uuid>,
) -> impl IntoResponse {
    let participation_service = ParticipationService::new(&state);

    match participation_service
        .join(campaign_id, user.profile_id)
        .await
    {
        Ok(participation) => (
            StatusCode::CREATED,
            Json(json!({
                "participation": participation,
                "message": "Successfully participated in campaign",
            })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

/// List the authenticated clipper's participations with campaign context
/// GET /clipper/participations
pub async fn my_participations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let participation_service = ParticipationService::new(&state);

    match participation_service.list_mine(user.profile_id).await {
        Ok(participations) => Json(json!({ "participations": participations })).into_response(),
        Err(error) => error.into_response(),
    }
}
