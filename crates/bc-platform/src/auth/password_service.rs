//! Password Hashing Service
//!
//! Salted, deliberately slow one-way hashing using Argon2id. Hashes are
//! stored in PHC string format so the salt and cost travel with the hash.

use std::sync::Arc;

use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2, Algorithm, Params, Version,
};
use tracing::{debug, warn};

use crate::shared::error::{PlatformError, Result};

/// Argon2id configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations) (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
    /// Output hash length in bytes (default: 32)
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    pub fn new(time_cost: u32, memory_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
            ..Self::default()
        }
    }

    /// Low memory config for testing (faster but less secure)
    pub fn testing() -> Self {
        Self {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
        .map_err(|e| PlatformError::configuration(format!("Invalid Argon2 params: {}", e)))
    }
}

/// Credential hasher
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(config: Argon2Config) -> Result<Self> {
        let params = config.to_params()?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Ok(Self { argon2 })
    }

    /// Hash a password with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PlatformError::internal(format!("Failed to hash password: {}", e)))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PlatformError::internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(PlatformError::internal(format!("Password verification error: {}", e))),
        }
    }

    /// True when the stored hash was produced with different parameters
    /// than this service now uses, or is not an Argon2id hash at all.
    pub fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(stored) => {
                let current = self.argon2.params();
                stored.m_cost() != current.m_cost()
                    || stored.t_cost() != current.t_cost()
                    || stored.p_cost() != current.p_cost()
            }
            Err(e) => {
                warn!(error = %e, "Unreadable Argon2 params in stored hash");
                true
            }
        }
    }

    /// Hash on the blocking pool so request workers are not stalled.
    pub async fn hash_password_async(self: &Arc<Self>, password: &str) -> Result<String> {
        let service = Arc::clone(self);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || service.hash_password(&password))
            .await
            .map_err(|e| PlatformError::internal(format!("Hashing task failed: {}", e)))?
    }

    pub async fn verify_password_async(self: &Arc<Self>, password: &str, hash: &str) -> Result<bool> {
        let service = Arc::clone(self);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || service.verify_password(&password, &hash))
            .await
            .map_err(|e| PlatformError::internal(format!("Verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Config::testing()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();

        let password = "testpassword123";
        let hash = service.hash_password(password).unwrap();

        // Hash is PHC format
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains(password));

        assert!(service.verify_password(password, &hash).unwrap());
        assert!(!service.verify_password("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_hash_uniqueness() {
        let service = service();

        let password = "testpassword123";
        let hash1 = service.hash_password(password).unwrap();
        let hash2 = service.hash_password(password).unwrap();

        // Same password produces different hashes (due to random salt)
        assert_ne!(hash1, hash2);

        assert!(service.verify_password(password, &hash1).unwrap());
        assert!(service.verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_empty_password_is_hashable() {
        let service = service();
        let hash = service.hash_password("").unwrap();
        assert!(service.verify_password("", &hash).unwrap());
        assert!(!service.verify_password(" ", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let service = service();
        assert!(service.verify_password("pw", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_needs_rehash() {
        let service = service();
        let hash = service.hash_password("pw").unwrap();
        assert!(!service.needs_rehash(&hash));

        let stronger = PasswordService::new(Argon2Config::new(2, 4096, 1)).unwrap();
        assert!(stronger.needs_rehash(&hash));
        assert!(service.needs_rehash("garbage"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordService::new(Argon2Config::new(0, 4096, 1));
        assert!(matches!(result, Err(PlatformError::Configuration { .. })));
    }

    #[test]
    fn test_async_hash_and_verify() {
        let service = Arc::new(service());
        tokio_test::block_on(async {
            let hash = service.hash_password_async("secret").await.unwrap();
            assert!(service.verify_password_async("secret", &hash).await.unwrap());
            assert!(!service.verify_password_async("other", &hash).await.unwrap());
        });
    }
}
