//! Password hashing
//!
//! Hashing sits behind a trait so the service layer never depends on a
//! concrete scheme and tests can substitute a cheap implementation.

use std::fmt::Debug;
use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use sha2::{Digest, Sha256};

use crate::config::{AuthConfig, PasswordScheme};
use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a plaintext password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// SHA-256 digest of `password + salt`, hex-encoded.
///
/// The salt is a single configured value shared by every user, so equal
/// passwords produce equal hashes and the salt does not slow down offline
/// guessing. Not suitable for production; select the `argon2` scheme in
/// `AuthConfig` for real deployments.
#[derive(Debug, Clone)]
pub struct SaltedSha256Hasher {
    salt: String,
}

impl SaltedSha256Hasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

impl PasswordHasher for SaltedSha256Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let digest = Sha256::digest(format!("{password}{}", self.salt).as_bytes());
        Ok(hex::encode(digest))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.hash(password).map(|h| h == hash).unwrap_or(false)
    }
}

/// Argon2id with a per-user random salt.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Build the configured hasher.
pub fn hasher_from_config(config: &AuthConfig) -> Result<Arc<dyn PasswordHasher>, DomainError> {
    match config.password_scheme {
        PasswordScheme::Sha256 => {
            if config.password_salt.is_empty() {
                return Err(DomainError::configuration(
                    "auth.password_salt must not be empty for the sha256 scheme",
                ));
            }
            Ok(Arc::new(SaltedSha256Hasher::new(&config.password_salt)))
        }
        PasswordScheme::Argon2 => Ok(Arc::new(Argon2Hasher::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hash_and_verify() {
        let hasher = SaltedSha256Hasher::new("test-salt");
        let hash = hasher.hash("my_secure_password").unwrap();

        assert_ne!(hash, "my_secure_password");
        assert!(hasher.verify("my_secure_password", &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_sha256_is_deterministic_per_salt() {
        let hasher = SaltedSha256Hasher::new("test-salt");
        assert_eq!(
            hasher.hash("password123").unwrap(),
            hasher.hash("password123").unwrap()
        );

        // Same password under a different salt hashes differently
        let other = SaltedSha256Hasher::new("other-salt");
        assert_ne!(
            hasher.hash("password123").unwrap(),
            other.hash("password123").unwrap()
        );
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("my_secure_password").unwrap();

        assert!(hasher.verify("my_secure_password", &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_argon2_hash_is_unique() {
        let hasher = Argon2Hasher::new();
        let hash1 = hasher.hash("my_secure_password").unwrap();
        let hash2 = hasher.hash("my_secure_password").unwrap();

        // Random per-user salt
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("my_secure_password", &hash1));
        assert!(hasher.verify("my_secure_password", &hash2));
    }

    #[test]
    fn test_argon2_verify_invalid_hash() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("password", "invalid_hash_format"));
        assert!(!hasher.verify("password", ""));
    }

    #[test]
    fn test_hasher_from_config() {
        let config = AuthConfig::default();
        let hasher = hasher_from_config(&config).unwrap();
        let hash = hasher.hash("password123").unwrap();
        assert!(hasher.verify("password123", &hash));
    }

    #[test]
    fn test_empty_salt_is_a_configuration_error() {
        let config = AuthConfig {
            password_salt: String::new(),
            password_scheme: PasswordScheme::Sha256,
        };
        let err = hasher_from_config(&config).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }
}
