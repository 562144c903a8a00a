pub mod auth;
pub mod campaign;
pub mod participation;
pub mod profile;

// Re-export common types
pub use auth::SessionClaims;
pub use campaign::{
    ActiveCampaign, Campaign, CampaignChanges, CampaignStatus, CampaignWithParticipants,
    CreateCampaignRequest, NewCampaign, UpdateCampaignRequest,
};
pub use participation::{
    CampaignParticipant, MyParticipation, NewParticipation, Participation, ParticipationStatus,
};
pub use profile::{NewProfile, Profile, ProfileChanges, ProfileError, ProfileResponse, UserRole};
