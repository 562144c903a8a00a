// Brand handlers: campaign management, participant review, dashboard

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
    models::{CreateCampaignRequest, UpdateCampaignRequest},
    services::{CampaignService, ParticipationService},
};

// =============================================================================
// BRAND HANDLERS
// =============================================================================

/// Brand dashboard with live aggregates over the brand's campaigns
/// GET /brand/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service
        .brand_dashboard_counts(user.profile_id)
        .await
    {
        Ok(counts) => Json(json!({
            "message": format!("Welcome to Brand dashboard, {}", user.email),
            "data": counts,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Create a campaign owned by the authenticated brand
/// POST /brand/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCampaignRequest>,
) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service.create(user.profile_id, request).await {
        Ok(campaign) => (StatusCode::CREATED, Json(json!({ "campaign": campaign }))).into_response(),
        Err(error) => error.into_response(),
    }
}

/// List the authenticated brand's campaigns with participant counts
/// GET /brand/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service.list_own(user.profile_id).await {
        Ok(campaigns) => Json(json!({ "campaigns": campaigns })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Update an owned campaign's editable fields
/// PATCH /brand/campaigns/{id}
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service
        .update(campaign_id, user.profile_id, request)
        .await
    {
        Ok(campaign) => Json(json!({ "campaign": campaign })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Flip an owned campaign between active and paused
/// PATCH /brand/campaigns/{id}/toggle
pub async fn toggle_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(campaign_id): Path<Uuid>,
) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service
        .toggle_status(campaign_id, user.profile_id)
        .await
    {
        Ok((campaign, message)) => Json(json!({
            "campaign": campaign,
            "message": message,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Delete an owned campaign
/// DELETE /brand/campaigns/{id}
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(campaign_id): Path<Uuid>,
) -> impl IntoResponse {
    let campaign_service = CampaignService::new(&state);

    match campaign_service.delete(campaign_id, user.profile_id).await {
        Ok(()) => Json(json!({ "message": "Campaign deleted successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}

/// List participants of an owned campaign
/// GET /brand/campaigns/{id}/participants
pub async fn list_participants(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(campaign_id): Path<Uuid>,
) -> impl IntoResponse {
    let participation_service = ParticipationService::new(&state);

    match participation_service
        .list_for_campaign(campaign_id, user.profile_id)
        .await
    {
        Ok(participants) => Json(json!({ "participants": participants })).into_response(),
        Err(error) => error.into_response(),
    }
}
