// Email verification token generation and expiry rules

use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// How long a verification token stays redeemable
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Generate a cryptographically secure email verification token
///
/// The raw token is stored against the profile and compared by equality at
/// redemption, then cleared so it can never be redeemed twice.
pub fn generate_verification_token() -> String {
    // 32 bytes of random data (256 bits of entropy)
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut token_bytes);

    // base64url for safe transmission in links and JSON
    BASE64_URL_SAFE_NO_PAD.encode(token_bytes)
}

/// Expiry timestamp for a token issued now
pub fn token_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS)
}

/// Whether a stored token expiry has passed
pub fn is_token_expired(expires_at: DateTime<Utc>) -> bool {
    expires_at < Utc::now()
}
