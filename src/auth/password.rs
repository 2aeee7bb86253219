use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use tracing::warn;

use crate::errors::AppError;

lazy_static! {
    /// Argon2id with memory=19456 KiB, iterations=2, parallelism=1
    static ref ARGON2: Argon2<'static> = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(19456, 2, 1, None).unwrap_or_default()
    );
}

/// Hash a password for storing in the users table.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    ARGON2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))
}

/// Check `password` against the stored value of a user row.
///
/// Stored values that are not Argon2 hashes never match; they are logged so
/// the row can be migrated.
pub fn verify_password(password: &str, stored: &str, username: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(username, error = %e, "Stored password is not an Argon2 hash, rejecting login");
            return false;
        }
    };
    ARGON2.verify_password(password.as_bytes(), &parsed).is_ok()
}
