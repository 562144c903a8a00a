// Authenticated session identity carried through request extensions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

/// Authenticated profile information extracted from the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub profile_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub token_id: String,
    pub exp: u64,
}
