//! Password hashing using argon2
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`) carrying their own salt
//! and cost parameters, so verification needs nothing but the stored string.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Async callers use the `*_async`
//! variants, which run on tokio's blocking pool.

use super::AuthError;
use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Password hashing service
///
/// Uses Argon2id with the crate's default cost, which is fixed for every
/// hash this service produces.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt (blocking operation)
    ///
    /// Only fails if the OS entropy source or the hasher itself fails.
    pub fn hash(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Signing(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| AuthError::Signing(format!("Task join error: {}", e)))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on a plain mismatch and `Err(CorruptCredential)`
    /// when the stored hash itself is unusable. The digest comparison inside
    /// argon2 is constant-time.
    pub fn verify(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::CorruptCredential(format!("Invalid hash format: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::CorruptCredential(e.to_string())),
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Signing(format!("Task join error: {}", e)))?
    }
}
