// Participation model and read-side projections
// One row per (campaign, clipper) pair, created by the join operation

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::campaign_participants;

/// Participation status; rows start as pending and are advanced by moderation
/// flows outside this service
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
pub enum ParticipationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ParticipationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Pending => "pending",
            ParticipationStatus::Approved => "approved",
            ParticipationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ParticipationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ParticipationStatus::Pending),
            "approved" => Ok(ParticipationStatus::Approved),
            "rejected" => Ok(ParticipationStatus::Rejected),
            _ => Err(format!("Invalid participation status: {}", s)),
        }
    }
}

impl std::fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for ParticipationStatus
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for ParticipationStatus
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

/// Participation model representing a database record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = campaign_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Participation {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub clipper_id: Uuid,
    pub status: ParticipationStatus,
    pub participated_at: DateTime<Utc>,
}

/// New participation row; id and timestamp come from column defaults
#[derive(Debug, Insertable)]
#[diesel(table_name = campaign_participants)]
pub struct NewParticipation {
    pub campaign_id: Uuid,
    pub clipper_id: Uuid,
    pub status: ParticipationStatus,
}

/// A clipper's participation annotated with campaign and brand context
#[derive(Debug, Clone, Serialize)]
pub struct MyParticipation {
    #[serde(flatten)]
    pub participation: Participation,
    pub campaign_name: String,
    pub campaign_description: String,
    pub brand_email: String,
}

/// A campaign participation annotated with the clipper's email, for the owner
#[derive(Debug, Clone, Serialize)]
pub struct CampaignParticipant {
    #[serde(flatten)]
    pub participation: Participation,
    pub clipper_email: String,
}
