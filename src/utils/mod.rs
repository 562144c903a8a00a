// Utility modules for the Clippers backend

pub mod auth_errors;
pub mod password;
pub mod service_error;

pub use auth_errors::{first_validation_message, AuthError};
pub use password::{hash_password, verify_password, PasswordError};
pub use service_error::ServiceError;
