// Campaign lifecycle: create, list, update, toggle, delete

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::db::DieselPool;
use crate::models::{
    ActiveCampaign, Campaign, CampaignStatus, CampaignWithParticipants, CreateCampaignRequest,
    NewCampaign, UpdateCampaignRequest,
};
use crate::schema::{campaign_participants, campaigns, profiles};
use crate::services::participation::ParticipationService;
use crate::utils::service_error::ServiceError;

/// Aggregates behind the brand dashboard
#[derive(Debug, Serialize)]
pub struct BrandDashboardCounts {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub total_participants: i64,
}

pub struct CampaignService {
    pool: DieselPool,
    participation: ParticipationService,
}

impl CampaignService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            participation: ParticipationService::new(state),
        }
    }

    /// Create a campaign owned by the calling brand; campaigns start active
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        brand_id: Uuid,
        request: CreateCampaignRequest,
    ) -> Result<Campaign, ServiceError> {
        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let new_campaign = NewCampaign {
            brand_id,
            name: request.name,
            description: request.description,
            rules: request.rules,
            budget: request.budget,
            status: CampaignStatus::Active,
        };

        let campaign = diesel::insert_into(campaigns::table)
            .values(&new_campaign)
            .get_result::<Campaign>(&mut conn)
            .await?;

        info!("Campaign {} created by brand {}", campaign.id, brand_id);

        Ok(campaign)
    }

    /// All campaigns owned by a brand, newest first, with live participant counts
    #[instrument(skip(self))]
    pub async fn list_own(
        &self,
        brand_id: Uuid,
    ) -> Result<Vec<CampaignWithParticipants>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let owned = campaigns::table
            .filter(campaigns::brand_id.eq(brand_id))
            .order(campaigns::created_at.desc())
            .select(Campaign::as_select())
            .load::<Campaign>(&mut conn)
            .await?;

        let ids: Vec<Uuid> = owned.iter().map(|c| c.id).collect();
        let counts = self.participation.counts_by_campaign(&ids).await?;

        Ok(owned
            .into_iter()
            .map(|campaign| {
                let participants_count = counts.get(&campaign.id).copied().unwrap_or(0);
                CampaignWithParticipants {
                    campaign,
                    participants_count,
                }
            })
            .collect())
    }

    /// All active campaigns across brands, newest first, with each owner's email
    ///
    /// The brand email is joined at read time, never stored on the campaign.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<ActiveCampaign>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let rows = campaigns::table
            .inner_join(profiles::table)
            .filter(campaigns::status.eq(CampaignStatus::Active))
            .order(campaigns::created_at.desc())
            .select((Campaign::as_select(), profiles::email))
            .load::<(Campaign, String)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(campaign, brand_email)| ActiveCampaign {
                campaign,
                brand_email,
            })
            .collect())
    }

    /// Apply a partial update to an owned campaign
    ///
    /// Ownership rides in the WHERE clause: a campaign owned by a different
    /// brand updates zero rows and reads as not found.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        campaign_id: Uuid,
        brand_id: Uuid,
        request: UpdateCampaignRequest,
    ) -> Result<Campaign, ServiceError> {
        request.validate()?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let changes = request.into_changes(Utc::now());

        let campaign = diesel::update(
            campaigns::table
                .filter(campaigns::id.eq(campaign_id))
                .filter(campaigns::brand_id.eq(brand_id)),
        )
        .set(&changes)
        .get_result::<Campaign>(&mut conn)
        .await?;

        Ok(campaign)
    }

    /// Flip a campaign between active and paused
    ///
    /// Returns the updated row and the display message for the response body.
    #[instrument(skip(self))]
    pub async fn toggle_status(
        &self,
        campaign_id: Uuid,
        brand_id: Uuid,
    ) -> Result<(Campaign, String), ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let current = campaigns::table
            .filter(campaigns::id.eq(campaign_id))
            .filter(campaigns::brand_id.eq(brand_id))
            .select(Campaign::as_select())
            .first::<Campaign>(&mut conn)
            .await
            .optional()?
            .ok_or(ServiceError::CampaignNotFound)?;

        let campaign = diesel::update(
            campaigns::table
                .filter(campaigns::id.eq(campaign_id))
                .filter(campaigns::brand_id.eq(brand_id)),
        )
        .set((
            campaigns::status.eq(current.status.toggled()),
            campaigns::updated_at.eq(Utc::now()),
        ))
        .get_result::<Campaign>(&mut conn)
        .await?;

        info!("Campaign {} toggled to {}", campaign.id, campaign.status);

        let message = format!("Campaign {}", campaign.status.as_str());
        Ok((campaign, message))
    }

    /// Hard-delete an owned campaign
    ///
    /// Participation rows are left in place; there is no cascade.
    #[instrument(skip(self))]
    pub async fn delete(&self, campaign_id: Uuid, brand_id: Uuid) -> Result<(), ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(
            campaigns::table
                .filter(campaigns::id.eq(campaign_id))
                .filter(campaigns::brand_id.eq(brand_id)),
        )
        .execute(&mut conn)
        .await?;

        if deleted == 0 {
            return Err(ServiceError::CampaignNotFound);
        }

        info!("Campaign {} deleted by brand {}", campaign_id, brand_id);

        Ok(())
    }

    /// Aggregates for the brand dashboard, computed per request
    #[instrument(skip(self))]
    pub async fn brand_dashboard_counts(
        &self,
        brand_id: Uuid,
    ) -> Result<BrandDashboardCounts, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let total_campaigns: i64 = campaigns::table
            .filter(campaigns::brand_id.eq(brand_id))
            .count()
            .get_result(&mut conn)
            .await?;

        let active_campaigns: i64 = campaigns::table
            .filter(campaigns::brand_id.eq(brand_id))
            .filter(campaigns::status.eq(CampaignStatus::Active))
            .count()
            .get_result(&mut conn)
            .await?;

        let total_participants: i64 = campaign_participants::table
            .inner_join(campaigns::table)
            .filter(campaigns::brand_id.eq(brand_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(BrandDashboardCounts {
            total_campaigns,
            active_campaigns,
            total_participants,
        })
    }
}
