// Middleware modules for the Clippers backend
// Session token validation, role gating and CORS

pub mod auth;
pub mod auth_middleware;
pub mod cors;

// Re-export auth types
pub use auth::AuthenticatedUser;
pub use auth_middleware::{auth_middleware, require_role};
pub use cors::dynamic_cors_middleware;
