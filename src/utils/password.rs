// Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Errors that can occur while producing a password hash
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),
}

// Argon2id cost parameters, fixed at build time rather than per call.
// 19 MiB / 2 iterations / 1 lane matches the OWASP minimum for web backends.
const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LENGTH: usize = 32;

fn build_hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LENGTH))
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password with Argon2id
///
/// Returns a PHC string embedding the algorithm, parameters and salt, so
/// verification needs nothing but the stored digest.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let argon2 = build_hasher()?;
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored digest
///
/// A malformed or foreign-scheme digest verifies as `false` rather than an
/// error, so login paths cannot distinguish a corrupt hash from a wrong
/// password.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
