//! TOML configuration parsing and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::routing::{HttpMethods, RouterConfig, DEFAULT_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,
    /// Route generation
    #[serde(default)]
    pub api: ApiConfig,
    /// Client IP allow-list
    #[serde(default)]
    pub trust: TrustConfig,
    /// How commands are run
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// Command discovery
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Log level
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Route generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// `"POST"` or a list such as `["GET", "POST"]`
    #[serde(default)]
    pub method: HttpMethods,
    /// First URI segment of every command route
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Give hidden commands a route too
    #[serde(default)]
    pub include_hidden: bool,
    /// Glob patterns of command names that never get a route
    #[serde(default = "default_forbidden_routes")]
    pub forbidden_routes: Vec<String>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_forbidden_routes() -> Vec<String> {
    [
        "serve",
        "tinker",
        "down",
        "up",
        "env",
        "key:generate",
        "db:wipe",
        "migrate:fresh",
        "migrate:reset",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            method: HttpMethods::default(),
            prefix: default_prefix(),
            include_hidden: false,
            forbidden_routes: default_forbidden_routes(),
        }
    }
}

impl ApiConfig {
    /// Router inputs derived from this section.
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            prefix: self.prefix.clone(),
            methods: self.method.clone(),
            forbidden_routes: self.forbidden_routes.clone(),
        }
    }
}

/// Client address allow-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Glob patterns matched against the client IP
    #[serde(default = "default_trusted_ips")]
    pub ip: Vec<String>,
}

fn default_trusted_ips() -> Vec<String> {
    vec!["127.0.0.1".to_string(), "::1".to_string()]
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            ip: default_trusted_ips(),
        }
    }
}

/// Command executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Interpreter or binary to spawn
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the command name, e.g. `artisan`
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Options added to every invocation, before the `--` separator
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
    /// Directory the console runs in
    #[serde(default = "default_working_dir")]
    pub working_dir: String,
    /// Seconds before a running command is killed
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_program() -> String {
    "php".to_string()
}

fn default_args() -> Vec<String> {
    vec!["artisan".to_string()]
}

fn default_extra_args() -> Vec<String> {
    vec!["--no-interaction".to_string(), "--no-ansi".to_string()]
}

fn default_working_dir() -> String {
    ".".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            extra_args: default_extra_args(),
            working_dir: default_working_dir(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[cfg(feature = "executor")]
impl ExecutorConfig {
    /// Settings for the process executor.
    pub fn process_config(&self) -> crate::executor::ProcessExecutorConfig {
        crate::executor::ProcessExecutorConfig {
            program: self.program.clone(),
            args: self.args.clone(),
            extra_args: self.extra_args.clone(),
            working_dir: PathBuf::from(&self.working_dir),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

/// Where commands are discovered from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// TOML manifest; when absent, commands come from the console listing
    pub manifest: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `DEBUG`, `INFO`, `WARNING`, `ERROR`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Loads and manages TOML configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    /// File the configuration was read from
    pub config_path: PathBuf,
    /// Parsed configuration, defaults filled in
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses `config/artisan-api.toml`;
    ///   a missing file yields the default configuration.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config/artisan-api.toml"));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            Configuration::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-parsed Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from("<memory>"),
            config,
        }
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Resolve the manifest path relative to the config file's directory.
    pub fn manifest_path(&self) -> Option<PathBuf> {
        let manifest = self.config.registry.manifest.as_ref()?;
        let manifest = PathBuf::from(manifest);
        if manifest.is_absolute() {
            return Some(manifest);
        }
        let base = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Some(base.join(manifest))
    }
}
