// Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

use crate::auth::error::AuthError;

/// Errors that can occur during password operations
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

impl From<PasswordError> for AuthError {
    fn from(_: PasswordError) -> Self {
        AuthError::PasswordHashError
    }
}

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    ///
    /// Returns the hash in PHC string format (algorithm, version, params,
    /// salt, and hash all encoded together).
    pub fn hash_password(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingError(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC-format hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "MySecureP@ssw0rd123!";

        let hash = PasswordService::hash_password(password).expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify_password(password, &hash).expect("Failed to verify"));
        assert!(!PasswordService::verify_password("WrongPassword", &hash)
            .expect("Failed to verify"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "TestPassword123!";

        let hash1 = PasswordService::hash_password(password).expect("Failed to hash password");
        let hash2 = PasswordService::hash_password(password).expect("Failed to hash password");

        // Random salt makes every hash unique
        assert_ne!(hash1, hash2);

        assert!(PasswordService::verify_password(password, &hash1).expect("Failed to verify"));
        assert!(PasswordService::verify_password(password, &hash2).expect("Failed to verify"));
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = PasswordService::verify_password("password", "not_a_valid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }
}
