// Participation engine: joining campaigns and reading participation state

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::app::AppState;
use crate::db::DieselPool;
use crate::models::{
    CampaignParticipant, CampaignStatus, MyParticipation, NewParticipation, Participation,
    ParticipationStatus,
};
use crate::schema::{campaign_participants, campaigns, profiles};
use crate::utils::service_error::ServiceError;

/// Aggregates behind the clipper dashboard
#[derive(Debug, Serialize)]
pub struct ClipperDashboardCounts {
    pub total_participations: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

pub struct ParticipationService {
    pool: DieselPool,
}

impl ParticipationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
        }
    }

    /// Join a clipper to an active campaign, creating a pending participation
    ///
    /// The advisory pre-check gives the friendly duplicate message; the unique
    /// index on (campaign_id, clipper_id) stays the authoritative guard when
    /// two joins race.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        campaign_id: Uuid,
        clipper_id: Uuid,
    ) -> Result<Participation, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let campaign_status = campaigns::table
            .filter(campaigns::id.eq(campaign_id))
            .select(campaigns::status)
            .first::<CampaignStatus>(&mut conn)
            .await
            .optional()?
            .ok_or(ServiceError::CampaignNotFound)?;

        if campaign_status != CampaignStatus::Active {
            return Err(ServiceError::CampaignInactive);
        }

        let already = diesel::select(diesel::dsl::exists(
            campaign_participants::table
                .filter(campaign_participants::campaign_id.eq(campaign_id))
                .filter(campaign_participants::clipper_id.eq(clipper_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        if already {
            return Err(ServiceError::AlreadyParticipated);
        }

        let new_participation = NewParticipation {
            campaign_id,
            clipper_id,
            status: ParticipationStatus::Pending,
        };

        let participation = diesel::insert_into(campaign_participants::table)
            .values(&new_participation)
            .get_result::<Participation>(&mut conn)
            .await?;

        info!(
            "Clipper {} joined campaign {} as participation {}",
            clipper_id, campaign_id, participation.id
        );

        Ok(participation)
    }

    /// A clipper's participations, newest first, with campaign and brand context
    #[instrument(skip(self))]
    pub async fn list_mine(&self, clipper_id: Uuid) -> Result<Vec<MyParticipation>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let rows = campaign_participants::table
            .inner_join(campaigns::table.inner_join(profiles::table))
            .filter(campaign_participants::clipper_id.eq(clipper_id))
            .order(campaign_participants::participated_at.desc())
            .select((
                Participation::as_select(),
                campaigns::name,
                campaigns::description,
                profiles::email,
            ))
            .load::<(Participation, String, String, String)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(participation, campaign_name, campaign_description, brand_email)| {
                    MyParticipation {
                        participation,
                        campaign_name,
                        campaign_description,
                        brand_email,
                    }
                },
            )
            .collect())
    }

    /// Participants of an owned campaign, newest first, with clipper emails
    ///
    /// The ownership probe conceals other brands' campaigns behind the same
    /// failure as a missing id.
    #[instrument(skip(self))]
    pub async fn list_for_campaign(
        &self,
        campaign_id: Uuid,
        brand_id: Uuid,
    ) -> Result<Vec<CampaignParticipant>, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let owned = diesel::select(diesel::dsl::exists(
            campaigns::table
                .filter(campaigns::id.eq(campaign_id))
                .filter(campaigns::brand_id.eq(brand_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        if !owned {
            return Err(ServiceError::CampaignNotOwned);
        }

        let rows = campaign_participants::table
            .inner_join(profiles::table)
            .filter(campaign_participants::campaign_id.eq(campaign_id))
            .order(campaign_participants::participated_at.desc())
            .select((Participation::as_select(), profiles::email))
            .load::<(Participation, String)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(participation, clipper_email)| CampaignParticipant {
                participation,
                clipper_email,
            })
            .collect())
    }

    /// Participant counts per campaign id, pushed down as a grouped aggregate
    #[instrument(skip(self, campaign_ids))]
    pub async fn counts_by_campaign(
        &self,
        campaign_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, ServiceError> {
        if campaign_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let rows = campaign_participants::table
            .filter(campaign_participants::campaign_id.eq_any(campaign_ids))
            .group_by(campaign_participants::campaign_id)
            .select((
                campaign_participants::campaign_id,
                diesel::dsl::count_star(),
            ))
            .load::<(Uuid, i64)>(&mut conn)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Aggregates for the clipper dashboard, computed per request
    #[instrument(skip(self))]
    pub async fn clipper_dashboard_counts(
        &self,
        clipper_id: Uuid,
    ) -> Result<ClipperDashboardCounts, ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

        let rows = campaign_participants::table
            .filter(campaign_participants::clipper_id.eq(clipper_id))
            .group_by(campaign_participants::status)
            .select((campaign_participants::status, diesel::dsl::count_star()))
            .load::<(ParticipationStatus, i64)>(&mut conn)
            .await?;

        let mut counts = ClipperDashboardCounts {
            total_participations: 0,
            pending: 0,
            approved: 0,
            rejected: 0,
        };
        for (status, tally) in rows {
            counts.total_participations += tally;
            match status {
                ParticipationStatus::Pending => counts.pending = tally,
                ParticipationStatus::Approved => counts.approved = tally,
                ParticipationStatus::Rejected => counts.rejected = tally,
            }
        }

        Ok(counts)
    }
}
