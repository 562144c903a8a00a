// Services module for the Clippers backend
// Business logic layer for the application

pub mod auth;
pub mod campaign;
pub mod jwt;
pub mod participation;
pub mod verification;

// Re-export commonly used services
pub use auth::{AuthService, RegisteredProfile};
pub use campaign::{BrandDashboardCounts, CampaignService};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use participation::{ClipperDashboardCounts, ParticipationService};
pub use verification::{
    generate_verification_token, is_token_expired, token_expiry, VERIFICATION_TOKEN_TTL_HOURS,
};
