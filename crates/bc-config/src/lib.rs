//! BankCore Configuration System
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub password: PasswordConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec![],
        }
    }
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "bankcore".to_string(),
        }
    }
}

/// Which store implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongodb,
    /// Process-local maps; data is lost on restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::ValidationError(format!(
                "unknown storage backend '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign customer tokens
    pub signing_secret: String,
    pub issuer: String,
    /// Tokens carry no expiry when unset
    pub token_expiry_secs: Option<u64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            issuer: "bankcore".to_string(),
            token_expiry_secs: None,
        }
    }
}

/// Password hashing cost configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Iteration count (argon2 time cost)
    pub cost: u32,
    pub memory_cost_kib: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: 3,
            memory_cost_kib: 65536,
            parallelism: 4,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject settings the platform cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.signing_secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.signing_secret must be set".to_string(),
            ));
        }
        if self.password.cost == 0 || self.password.parallelism == 0 {
            return Err(ConfigError::ValidationError(
                "password.cost and password.parallelism must be positive".to_string(),
            ));
        }
        if self.password.memory_cost_kib < 8 * self.password.parallelism {
            return Err(ConfigError::ValidationError(
                "password.memory_cost_kib must be at least 8 * parallelism".to_string(),
            ));
        }
        if self.auth.token_expiry_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "auth.token_expiry_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# BankCore Configuration
# Environment variables (BANKCORE_*) override these settings

[http]
port = 8080
host = "0.0.0.0"
cors_origins = []

[mongodb]
uri = "mongodb://localhost:27017"
database = "bankcore"

[storage]
backend = "mongodb"  # mongodb or memory

[auth]
signing_secret = "change-me"
issuer = "bankcore"
# token_expiry_secs = 86400  # omit for non-expiring tokens

[password]
cost = 3
memory_cost_kib = 65536
parallelism = 4
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_toml_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Mongodb);
        assert_eq!(config.auth.signing_secret, "change-me");
        assert_eq!(config.auth.token_expiry_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[storage]
backend = "memory"

[auth]
signing_secret = "s3cret"
token_expiry_secs = 3600
"#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.token_expiry_secs, Some(3600));
        assert_eq!(config.mongodb.database, "bankcore");
        assert_eq!(config.password.cost, 3);
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_cost() {
        let mut config = AppConfig::default();
        config.auth.signing_secret = "secret".to_string();
        config.password.cost = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("Mongo".parse::<StorageBackend>().unwrap(), StorageBackend::Mongodb);
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
