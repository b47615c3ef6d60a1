//! Environment variable loading and management.
//!
//! Environment values override the matching TOML settings at startup.

use std::env;
use std::path::Path;

/// Path of the TOML configuration file.
pub const CONFIG_VAR: &str = "ARTISAN_API_CONFIG";
/// Listen address override.
pub const BIND_VAR: &str = "ARTISAN_API_BIND";
/// Log level override.
pub const LOG_VAR: &str = "ARTISAN_API_LOG";

/// Loads environment variables from .env file and system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to .env file. Nothing is loaded unless a path is given.
    pub fn new(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load .env file");
                }
            } else {
                tracing::warn!(path = %path.display(), ".env file not found");
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
        }
    }

    /// The .env file this loader was created with.
    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// Configuration file path from the environment.
    pub fn config_path(&self) -> Option<String> {
        non_empty(CONFIG_VAR)
    }

    /// Listen address override.
    pub fn bind(&self) -> Option<String> {
        non_empty(BIND_VAR)
    }

    /// Log level override.
    pub fn log_level(&self) -> Option<String> {
        non_empty(LOG_VAR)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // Single test so concurrent tests never race on the same variables.
    #[test]
    fn test_overrides_from_environment_and_file() {
        env::remove_var(BIND_VAR);
        env::remove_var(LOG_VAR);
        env::remove_var(CONFIG_VAR);

        let env_loader = EnvironmentLoader::default();
        assert!(env_loader.env_file().is_none());
        assert_eq!(env_loader.bind(), None);
        assert_eq!(env_loader.log_level(), None);

        env::set_var(BIND_VAR, "0.0.0.0:9000");
        env::set_var(LOG_VAR, "  ");
        assert_eq!(env_loader.bind(), Some("0.0.0.0:9000".to_string()));
        assert_eq!(env_loader.log_level(), None);
        env::remove_var(BIND_VAR);
        env::remove_var(LOG_VAR);

        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(&env_path, "ARTISAN_API_CONFIG=/etc/artisan-api.toml\n").unwrap();

        let env_loader = EnvironmentLoader::new(Some(env_path.as_path()));
        assert!(env_loader.env_file().is_some());
        assert_eq!(env_loader.config_path(), Some("/etc/artisan-api.toml".to_string()));
        env::remove_var(CONFIG_VAR);
    }

    #[test]
    fn test_missing_env_file_is_not_fatal() {
        let env_loader = EnvironmentLoader::new(Some(Path::new("/nonexistent/.env")));
        assert_eq!(env_loader.env_file(), Some("/nonexistent/.env"));
    }
}
