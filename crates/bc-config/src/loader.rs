//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "bankcore.toml",
    "./config/config.toml",
    "/etc/bankcore/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, |key| env::var(key).ok())?;

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured file does not exist, searching defaults");
        }

        if let Ok(path) = env::var("BANKCORE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `BANKCORE_*` overrides read through `lookup`.
///
/// Unparseable numeric values are ignored with a warning, matching how a
/// missing variable is treated. An unknown storage backend is an error.
pub(crate) fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    fn parsed<T: std::str::FromStr>(key: &str, value: String) -> Option<T> {
        match value.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(key, value = %value, "Ignoring unparseable override");
                None
            }
        }
    }

    // HTTP
    if let Some(port) = lookup("BANKCORE_HTTP_PORT").and_then(|v| parsed("BANKCORE_HTTP_PORT", v)) {
        config.http.port = port;
    }
    if let Some(val) = lookup("BANKCORE_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("BANKCORE_CORS_ORIGINS") {
        config.http.cors_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // MongoDB
    if let Some(val) = lookup("BANKCORE_MONGODB_URI") {
        config.mongodb.uri = val;
    }
    if let Some(val) = lookup("BANKCORE_MONGODB_DATABASE") {
        config.mongodb.database = val;
    }

    // Storage
    if let Some(val) = lookup("BANKCORE_STORAGE_BACKEND") {
        config.storage.backend = val.parse()?;
    }

    // Auth
    if let Some(val) = lookup("BANKCORE_SIGNING_SECRET") {
        config.auth.signing_secret = val;
    }
    if let Some(val) = lookup("BANKCORE_TOKEN_ISSUER") {
        config.auth.issuer = val;
    }
    if let Some(val) = lookup("BANKCORE_TOKEN_EXPIRY_SECS") {
        config.auth.token_expiry_secs = if val.trim().is_empty() {
            None
        } else {
            parsed("BANKCORE_TOKEN_EXPIRY_SECS", val).or(config.auth.token_expiry_secs)
        };
    }

    // Password hashing
    if let Some(cost) = lookup("BANKCORE_PASSWORD_COST").and_then(|v| parsed("BANKCORE_PASSWORD_COST", v)) {
        config.password.cost = cost;
    }
    if let Some(mem) = lookup("BANKCORE_PASSWORD_MEMORY_KIB").and_then(|v| parsed("BANKCORE_PASSWORD_MEMORY_KIB", v)) {
        config.password.memory_cost_kib = mem;
    }
    if let Some(p) = lookup("BANKCORE_PASSWORD_PARALLELISM").and_then(|v| parsed("BANKCORE_PASSWORD_PARALLELISM", v)) {
        config.password.parallelism = p;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageBackend;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            lookup_from(&[
                ("BANKCORE_HTTP_PORT", "9000"),
                ("BANKCORE_SIGNING_SECRET", "from-env"),
                ("BANKCORE_STORAGE_BACKEND", "memory"),
                ("BANKCORE_TOKEN_EXPIRY_SECS", "600"),
                ("BANKCORE_PASSWORD_COST", "5"),
                ("BANKCORE_CORS_ORIGINS", "http://a, http://b,"),
            ]),
        )
        .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.auth.signing_secret, "from-env");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.token_expiry_secs, Some(600));
        assert_eq!(config.password.cost, 5);
        assert_eq!(config.http.cors_origins, vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_bad_numbers_are_ignored() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, lookup_from(&[("BANKCORE_HTTP_PORT", "eighty")])).unwrap();
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_unknown_backend_is_error() {
        let mut config = AppConfig::default();
        let result = apply_overrides(&mut config, lookup_from(&[("BANKCORE_STORAGE_BACKEND", "redis")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mongodb]\ndatabase = \"bank_test\"\n\n[auth]\nsigning_secret = \"x\"").unwrap();

        let config = ConfigLoader::with_path(file.path()).load().unwrap();
        assert_eq!(config.mongodb.database, "bank_test");
        assert_eq!(config.auth.signing_secret, "x");
    }
}
