// Session token issuing and validation with HS256

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::app_config::AppConfig;
use crate::models::{SessionClaims, UserRole};

// Error types for session token operations
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Clock error: {0}")]
    ClockError(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken => JwtError::InvalidToken,
            _ => JwtError::EncodingError(err.to_string()),
        }
    }
}

/// Signing configuration for session tokens
///
/// One symmetric key pair, loaded once at startup. There is no key rotation:
/// changing the secret invalidates every outstanding session.
#[derive(Clone)]
pub struct JwtConfig {
    pub session_token_expiry: u64, // seconds
    pub algorithm: Algorithm,

    // Expected audience/issuer baked into every token
    pub audience: String,
    pub issuer: String,

    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("session_token_expiry", &self.session_token_expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    /// Build JWT config from provided parameters - shared by the env and test paths
    fn build_from_params(secret: &str, session_expiry: u64, audience: String, issuer: String) -> Self {
        JwtConfig {
            session_token_expiry: session_expiry,
            algorithm: Algorithm::HS256,
            audience,
            issuer,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create JWT config from the loaded application configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::build_from_params(
            &config.jwt_secret,
            config.session_token_expiry,
            config.jwt_audience.clone(),
            config.jwt_issuer.clone(),
        )
    }

    /// Deterministic config for tests, no environment required
    pub fn for_test() -> Self {
        Self::build_from_params(
            "test-session-secret-with-enough-length!",
            604800, // 7 days
            "test.clippers.app".to_string(),
            "test.clippers.app".to_string(),
        )
    }

    /// Same as `for_test` but with a custom expiry, for expiration tests
    pub fn for_test_with_expiry(session_expiry: u64) -> Self {
        Self::build_from_params(
            "test-session-secret-with-enough-length!",
            session_expiry,
            "test.clippers.app".to_string(),
            "test.clippers.app".to_string(),
        )
    }
}

/// Stateless session token service
///
/// Issued tokens are self-contained; validation needs only the shared secret,
/// no store round-trip.
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    /// Create new JWT service with configuration
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Issue a session token for an authenticated profile
    pub fn issue_session(
        &self,
        profile_id: Uuid,
        role: UserRole,
        email: &str,
    ) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| JwtError::ClockError(e.to_string()))?
            .as_secs();

        let claims = SessionClaims::new(
            profile_id.to_string(),
            Uuid::new_v4().to_string(),
            email.to_string(),
            role,
            self.config.audience.clone(),
            self.config.issuer.clone(),
            now,
            now + self.config.session_token_expiry,
        );

        let header = Header::new(self.config.algorithm);
        encode(&header, &claims, &self.config.encoding_key).map_err(Into::into)
    }

    /// Validate a session token and return the decoded claims
    ///
    /// # Errors
    /// * `JwtError::TokenExpired` - token past its expiry (leeway is zero)
    /// * `JwtError::InvalidToken` - malformed token
    /// * `JwtError::EncodingError` - bad signature or wrong audience/issuer
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.config.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Session lifetime in seconds, as configured
    pub fn session_token_expiry(&self) -> u64 {
        self.config.session_token_expiry
    }
}
