//! Artisan API - Expose console commands as HTTP routes
//!
//! Builds one HTTP route per eligible console command from a command
//! registry, guards them with an IP allow-list, and answers every request
//! with a uniform JSON envelope. The crate is split into feature-gated modules:
//!
//! - **`registry`** - Command metadata, registries and discovery sources
//! - **`routing`** - Route adapter, forbidden globs and route table generation
//! - **`envelope`** - Per-request response envelope
//! - **`executor`** - Running commands as child processes
//! - **`config`** - Configuration and environment loading
//! - **`observability`** - Tracing subscriber setup
//! - **`server`** - Access control, entry point and the axum application
//! - **`cli`** - The `artisan-api` command line
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! artisan-api = { version = "0.1", default-features = false }
//! # Or with the HTTP surface:
//! artisan-api = { version = "0.1", default-features = false, features = ["server"] }
//! # Or enable everything:
//! artisan-api = { version = "0.1", features = ["all"] }
//! ```
//!
//! # Example: generating routes
//!
//! ```
//! use artisan_api::registry::{Command, CommandRegistry, DefaultCommandRegistry, Parameter};
//! use artisan_api::routing::{Router, RouterConfig};
//!
//! let mut registry = DefaultCommandRegistry::new();
//! registry
//!     .register(
//!         Command::new("make:model", "Create a new Eloquent model class")
//!             .with_parameter(Parameter::required("name")),
//!     )
//!     .unwrap();
//! registry.register(Command::new("tinker", "Interact with your application")).unwrap();
//!
//! let mut router = Router::new(RouterConfig {
//!     forbidden_routes: vec!["tinker".to_string()],
//!     ..RouterConfig::default()
//! })
//! .unwrap();
//! let table = router.generate(&registry, false).unwrap();
//!
//! assert_eq!(table.routes(), vec!["/artisan/make/model/{name}"]);
//! assert_eq!(table.descriptors()[0].route_name, "artisan.api.make.model");
//! assert_eq!(table.static_routes(), vec!["/all", "/command"]);
//! ```
//!
//! # Example: the response envelope
//!
//! ```
//! use artisan_api::envelope::Envelope;
//!
//! let mut envelope = Envelope::new();
//! envelope.set_output("Application cache cleared.", Some(200));
//!
//! let rendered = envelope.json(None).unwrap();
//! assert_eq!(rendered.body["ok"], true);
//! ```

#![warn(missing_docs)]

/// Command metadata and discovery
pub mod registry;

/// Route generation
pub mod routing;

/// Response envelope
pub mod envelope;

/// Command execution (enabled with the `executor` feature)
#[cfg(feature = "executor")]
pub mod executor;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Logging setup (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// HTTP server (enabled with the `server` feature)
#[cfg(feature = "server")]
pub mod server;

/// Command line interface (enabled with the `cli` feature)
#[cfg(feature = "cli")]
pub mod cli;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::envelope::{Envelope, EnvelopeError};
    pub use crate::registry::{
        Command, CommandRegistry, CommandSource, DefaultCommandRegistry, Parameter, ParameterKind,
    };
    pub use crate::routing::{RouteTable, Router, RouterConfig};

    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};

    #[cfg(feature = "executor")]
    pub use crate::executor::{CommandExecutor, CommandOutput, Invocation, ProcessExecutor};

    #[cfg(feature = "server")]
    pub use crate::server::{build_app, AccessPolicy, AppState};
}
