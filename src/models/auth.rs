// Session token claims for the marketplace backend

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profile::UserRole;

/// Session token claims structure
/// Self-describing: everything the authorization layer needs is in the token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Profile ID (subject)
    pub sub: String,

    /// JWT ID (UUID format)
    pub jti: String,

    /// Account email address
    pub email: String,

    /// Account role (Brand or Clipper)
    pub role: UserRole,

    /// Audience (aud)
    pub aud: String,

    /// Issuer (iss)
    pub iss: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

impl SessionClaims {
    /// Create new session claims
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profile_id: String,
        token_id: String,
        email: String,
        role: UserRole,
        audience: String,
        issuer: String,
        issued_at: u64,
        expires_at: u64,
    ) -> Self {
        Self {
            sub: profile_id,
            jti: token_id,
            email,
            role,
            aud: audience,
            iss: issuer,
            iat: issued_at,
            exp: expires_at,
        }
    }

    /// The subject parsed back into a profile ID
    pub fn profile_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(role: UserRole, iat: u64, exp: u64) -> SessionClaims {
        SessionClaims::new(
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
            "user@example.com".to_string(),
            role,
            "clippers.app".to_string(),
            "clippers.app".to_string(),
            iat,
            exp,
        )
    }

    #[test]
    fn test_session_claims_structure() {
        let claims = sample_claims(UserRole::Brand, 1640995200, 1641600000);

        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, UserRole::Brand);
        assert_eq!(claims.aud, "clippers.app");
        assert_eq!(claims.iss, "clippers.app");
        assert_eq!(claims.iat, 1640995200);
        assert_eq!(claims.exp, 1641600000);
        assert!(claims.profile_id().is_ok());
    }

    #[test]
    fn test_session_claims_serialization() {
        let claims = sample_claims(UserRole::Clipper, 1640995200, 1641600000);

        let json = serde_json::to_string(&claims).expect("Should serialize");
        assert!(json.contains("\"role\":\"Clipper\""));

        let deserialized: SessionClaims = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_session_claims_field_count() {
        let claims = sample_claims(UserRole::Brand, 0, 0);

        let json_value = serde_json::to_value(&claims).expect("Should serialize");
        let obj = json_value.as_object().expect("Should be object");

        assert_eq!(obj.len(), 8, "SessionClaims should have exactly 8 fields");
        for key in ["sub", "jti", "email", "role", "aud", "iss", "iat", "exp"] {
            assert!(obj.contains_key(key), "missing claim field {}", key);
        }
    }

    #[test]
    fn test_token_expiry_check() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let expired = sample_claims(UserRole::Brand, now - 3600, now - 1);
        assert!(expired.is_expired(), "Token should be expired");

        let valid = sample_claims(UserRole::Brand, now, now + 3600);
        assert!(!valid.is_expired(), "Token should not be expired");
    }

    #[test]
    fn test_profile_id_rejects_malformed_subject() {
        let mut claims = sample_claims(UserRole::Clipper, 0, 0);
        claims.sub = "not-a-uuid".to_string();
        assert!(claims.profile_id().is_err());
    }
}
