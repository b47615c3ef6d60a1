//! Configuration management.
//!
//! This module provides configuration loading through TOML files and
//! environment variable overrides via `.env` files.
//!
//! # Example
//!
//! ```no_run
//! use artisan_api::config::{ConfigurationLoader, EnvironmentLoader};
//! use std::path::Path;
//!
//! let env = EnvironmentLoader::new(None);
//! let loader = ConfigurationLoader::new(Some(Path::new("config/artisan-api.toml"))).unwrap();
//! let config = &loader.config;
//!
//! println!("Prefix: {}", config.api.prefix);
//! println!("Bind: {}", env.bind().unwrap_or_else(|| config.server.bind.clone()));
//! ```

#[allow(clippy::module_inception)]
pub mod config;
pub mod environment;

pub use self::config::{
    ApiConfig, Configuration, ConfigurationLoader, ExecutorConfig, LoggingConfig, RegistryConfig,
    ServerConfig, TrustConfig,
};
pub use self::environment::EnvironmentLoader;
