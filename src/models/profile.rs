// Profile database model
// Identity records for both brand and clipper accounts

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::profiles;

/// Account role enumeration; fixed at registration, never mutated afterwards
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
pub enum UserRole {
    Brand,
    Clipper,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Brand => "Brand",
            UserRole::Clipper => "Clipper",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Brand" => Ok(UserRole::Brand),
            "Clipper" => Ok(UserRole::Clipper),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<DB> diesel::deserialize::FromSql<diesel::sql_types::Text, DB> for UserRole
where
    DB: diesel::backend::Backend,
    String: diesel::deserialize::FromSql<diesel::sql_types::Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        Self::from_str(&value).map_err(|e| e.into())
    }
}

impl<DB> diesel::serialize::ToSql<diesel::sql_types::Text, DB> for UserRole
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

/// Profile database model - queryable from database
///
/// Not serialized directly; API responses go through [`ProfileResponse`] so the
/// password hash and verification token never leave the service.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New profile for insertion; id and timestamps come from column defaults
#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires: Option<DateTime<Utc>>,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub email_verified: Option<bool>,
    pub verification_token: Option<Option<String>>,
    pub verification_token_expires: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Public projection of a profile, safe to serialize in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
            email_verified: profile.email_verified,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Errors for profile operations
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("Database error: {0}")]
    Database(diesel::result::Error),

    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    DuplicateEmail,
}

impl Profile {
    /// Find profile by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        profile_id: Uuid,
    ) -> Result<Self, ProfileError> {
        use crate::schema::profiles::dsl::*;

        profiles
            .filter(id.eq(profile_id))
            .first::<Profile>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ProfileError::NotFound,
                _ => ProfileError::Database(e),
            })
    }

    /// Find profile by email; callers normalize the email first
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Self, ProfileError> {
        use crate::schema::profiles::dsl::*;

        profiles
            .filter(email.eq(email_str))
            .first::<Profile>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ProfileError::NotFound,
                _ => ProfileError::Database(e),
            })
    }

    /// Find profile holding an unconsumed verification token
    pub async fn find_by_verification_token(
        conn: &mut AsyncPgConnection,
        token: &str,
    ) -> Result<Self, ProfileError> {
        use crate::schema::profiles::dsl::*;

        profiles
            .filter(verification_token.eq(token))
            .first::<Profile>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ProfileError::NotFound,
                _ => ProfileError::Database(e),
            })
    }

    /// Check whether another profile already holds this email
    pub async fn email_taken_by_other(
        conn: &mut AsyncPgConnection,
        email_str: &str,
        excluding: Uuid,
    ) -> Result<bool, ProfileError> {
        use crate::schema::profiles::dsl::*;
        use diesel::dsl::exists;

        diesel::select(exists(
            profiles.filter(email.eq(email_str).and(id.ne(excluding))),
        ))
        .get_result::<bool>(conn)
        .await
        .map_err(ProfileError::Database)
    }

    /// Create a new profile
    ///
    /// The unique index on `profiles.email` is the authoritative duplicate
    /// guard; concurrent inserts surface here as `DuplicateEmail`.
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_profile: NewProfile,
    ) -> Result<Self, ProfileError> {
        use crate::schema::profiles::dsl::*;

        diesel::insert_into(profiles)
            .values(&new_profile)
            .get_result::<Profile>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ProfileError::DuplicateEmail
                },
                _ => ProfileError::Database(e),
            })
    }

    /// Apply a partial update to a profile
    pub async fn update(
        conn: &mut AsyncPgConnection,
        profile_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Self, ProfileError> {
        use crate::schema::profiles::dsl::*;

        diesel::update(profiles.filter(id.eq(profile_id)))
            .set(&changes)
            .get_result::<Profile>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ProfileError::NotFound,
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ProfileError::DuplicateEmail
                },
                _ => ProfileError::Database(e),
            })
    }

    /// Public projection for API responses
    pub fn to_response(&self) -> ProfileResponse {
        ProfileResponse::from(self)
    }
}
