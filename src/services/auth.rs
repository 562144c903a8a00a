// Identity flows: registration, login, email verification, profile maintenance

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::app::AppState;
use crate::db::DieselPool;
use crate::models::{NewProfile, Profile, ProfileChanges, ProfileError, UserRole};
use crate::services::jwt::JwtService;
use crate::services::verification::{generate_verification_token, is_token_expired, token_expiry};
use crate::utils::auth_errors::AuthError;
use crate::utils::password::{hash_password, verify_password};

/// Everything a successful registration hands back to the caller
///
/// The verification token is returned in the response body until an email
/// sender is wired up.
#[derive(Debug)]
pub struct RegisteredProfile {
    pub profile: Profile,
    pub session_token: String,
    pub verification_token: String,
}

pub struct AuthService {
    pool: DieselPool,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.diesel_pool.clone(),
            jwt_service: state.jwt_service.clone(),
        }
    }

    /// Register a new account and issue its first session token
    ///
    /// Callers normalize the email before this point. The pre-check gives a
    /// friendly duplicate message without paying for a hash; the unique index
    /// on `profiles.email` stays the authoritative guard at insert time.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<RegisteredProfile, AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        match Profile::find_by_email(&mut conn, email).await {
            Ok(_) => return Err(AuthError::DuplicateEmail),
            Err(ProfileError::NotFound) => {},
            Err(e) => return Err(e.into()),
        }

        let password_hash = hash_password(password)?;
        let verification_token = generate_verification_token();

        let new_profile = NewProfile {
            email: email.to_string(),
            password_hash: Some(password_hash),
            role,
            email_verified: false,
            verification_token: Some(verification_token.clone()),
            verification_token_expires: Some(token_expiry()),
        };

        let profile = Profile::create(&mut conn, new_profile).await?;

        info!("Registered {} account {}", profile.role, profile.id);

        let session_token = self
            .jwt_service
            .issue_session(profile.id, profile.role, &profile.email)?;

        Ok(RegisteredProfile {
            profile,
            session_token,
            verification_token,
        })
    }

    /// Authenticate with email and password, issuing a session token
    ///
    /// Unknown email, wrong password and passwordless accounts are
    /// indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(Profile, String), AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let profile = match Profile::find_by_email(&mut conn, email).await {
            Ok(profile) => profile,
            Err(ProfileError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        let valid = match profile.password_hash.as_deref() {
            Some(stored_hash) => verify_password(password, stored_hash),
            None => false,
        };
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let session_token = self
            .jwt_service
            .issue_session(profile.id, profile.role, &profile.email)?;

        info!("Login for profile {}", profile.id);

        Ok((profile, session_token))
    }

    /// Redeem an email verification token
    ///
    /// A token redeems at most once: the row update clears it together with
    /// its expiry, so a second call fails the lookup.
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let profile = match Profile::find_by_verification_token(&mut conn, token).await {
            Ok(profile) => profile,
            Err(ProfileError::NotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        match profile.verification_token_expires {
            Some(expires_at) if !is_token_expired(expires_at) => {},
            _ => return Err(AuthError::ExpiredToken),
        }

        let changes = ProfileChanges {
            email_verified: Some(true),
            verification_token: Some(None),
            verification_token_expires: Some(None),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        Profile::update(&mut conn, profile.id, changes).await?;

        info!("Email verified for profile {}", profile.id);

        Ok(())
    }

    /// Change the password of an authenticated profile
    ///
    /// An account with no password set fails the current-password check the
    /// same way a wrong password does.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        profile_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let profile = Profile::find_by_id(&mut conn, profile_id).await?;

        let valid = match profile.password_hash.as_deref() {
            Some(stored_hash) => verify_password(current_password, stored_hash),
            None => false,
        };
        if !valid {
            return Err(AuthError::IncorrectPassword);
        }

        let changes = ProfileChanges {
            password_hash: Some(hash_password(new_password)?),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        Profile::update(&mut conn, profile_id, changes).await?;

        info!("Password changed for profile {}", profile_id);

        Ok(())
    }

    /// Fetch the authenticated profile
    #[instrument(skip(self))]
    pub async fn get_profile(&self, profile_id: Uuid) -> Result<Profile, AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(Profile::find_by_id(&mut conn, profile_id).await?)
    }

    /// Update the authenticated profile; only the email is mutable
    ///
    /// Role and verification state never change through this path.
    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        profile_id: Uuid,
        new_email: Option<String>,
    ) -> Result<Profile, AuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if let Some(email) = &new_email {
            let taken = Profile::email_taken_by_other(&mut conn, email, profile_id).await?;
            if taken {
                return Err(AuthError::EmailInUse);
            }
        }

        let changes = ProfileChanges {
            email: new_email,
            updated_at: Some(Utc::now()),
            ..Default::default()
        };

        Profile::update(&mut conn, profile_id, changes)
            .await
            .map_err(|e| match e {
                // Unique-index race on the new email; report it like the pre-check
                ProfileError::DuplicateEmail => AuthError::EmailInUse,
                other => other.into(),
            })
    }
}
