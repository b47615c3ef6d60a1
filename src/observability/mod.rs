//! Structured logging.
//!
//! Installs a `tracing` subscriber writing formatted events to stderr. The
//! `RUST_LOG` environment variable, when set, takes precedence over the
//! configured level.
//!
//! # Example
//!
//! ```no_run
//! artisan_api::observability::init("DEBUG");
//! tracing::info!("ready");
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Translate a configured level such as `"INFO"` or `"warning"` into a filter
/// directive for this crate and the HTTP stack.
pub fn directive(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        "off" => "off",
        _ => "info",
    };
    format!("artisan_api={level},tower_http={level}")
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which happens in
/// tests that initialize logging more than once.
pub fn init(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| directive(level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
