// Campaign model and request/response shapes
// A campaign is published by a brand and toggled between active and paused

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::schema::campaigns;

// =============================================================================
// STATUS ENUM
// =============================================================================

/// Campaign status; the only transition is the explicit toggle
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    diesel::expression::AsExpression,
    diesel::deserialize::FromSqlRow,
)]
#[diesel(sql_type = diesel::sql_types::Text)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
        }
    }

    /// The opposite status; applying this twice restores the original
    pub fn toggled(&self) -> Self {
        match self {
            CampaignStatus::Active => CampaignStatus::Paused,
            CampaignStatus::Paused => CampaignStatus::Active,
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            _ => Err(format!("Invalid campaign status: {}", s)),
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for CampaignStatus
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for CampaignStatus
where
    DB: diesel::backend::Backend,
    str: diesel::serialize::ToSql<diesel::sql_types::Text, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        self.as_str().to_sql(out)
    }
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Campaign model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = campaigns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Campaign {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub description: String,
    pub rules: String,
    pub budget: f64,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New campaign for insertion; id and timestamps come from column defaults
#[derive(Debug, Insertable)]
#[diesel(table_name = campaigns)]
pub struct NewCampaign {
    pub brand_id: Uuid,
    pub name: String,
    pub description: String,
    pub rules: String,
    pub budget: f64,
    pub status: CampaignStatus,
}

/// Partial campaign update; `None` fields are left untouched
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = campaigns)]
pub struct CampaignChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub budget: Option<f64>,
    pub status: Option<CampaignStatus>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// READ-SIDE PROJECTIONS
// =============================================================================

/// Campaign annotated with its live participant count, for the owner's listing
#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithParticipants {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub participants_count: i64,
}

/// Active campaign annotated with the owning brand's email, for the clipper feed
#[derive(Debug, Clone, Serialize)]
pub struct ActiveCampaign {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub brand_email: String,
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request to create a new campaign
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 3, message = "Campaign name must be at least 3 characters"))]
    pub name: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(length(min = 5, message = "Rules must be at least 5 characters"))]
    pub rules: String,

    #[validate(custom(function = "validate_budget"))]
    pub budget: f64,
}

/// Request to update an existing campaign; all fields optional
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 3, message = "Campaign name must be at least 3 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 5, message = "Rules must be at least 5 characters"))]
    pub rules: Option<String>,

    #[validate(custom(function = "validate_budget"))]
    pub budget: Option<f64>,
}

/// Budget must be strictly positive
fn validate_budget(budget: f64) -> Result<(), validator::ValidationError> {
    if budget.is_finite() && budget > 0.0 {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("budget_not_positive");
        err.message = Some("Budget must be a positive number".into());
        Err(err)
    }
}

impl UpdateCampaignRequest {
    /// Convert into a changeset, stamping the update time
    ///
    /// Even an empty patch produces a non-empty changeset, so the update
    /// statement never degenerates.
    pub fn into_changes(self, now: DateTime<Utc>) -> CampaignChanges {
        CampaignChanges {
            name: self.name,
            description: self.description,
            rules: self.rules,
            budget: self.budget,
            status: None,
            updated_at: Some(now),
        }
    }
}
