//! HTTP surface: access check, entry point and startup.
//!
//! ```text
//!   request ─► TraceLayer ─► access::enforce ─► invoke::invoke
//!                                 │                  │
//!                           404 if untrusted   RouteTable::resolve
//!                                                    │
//!                                             CommandExecutor
//!                                                    │
//!                                              Envelope::json
//! ```
//!
//! Every path goes through one fallback handler; routing happens against the
//! generated [`RouteTable`](crate::routing::RouteTable) rather than axum's
//! own router, so optional segments and overlapping templates resolve the
//! same way the table describes them.

pub mod access;
pub mod invoke;
mod state;

pub use access::AccessPolicy;
pub use invoke::{bind, collect_params, invoke, Params, COMMAND_KEY};
pub use state::AppState;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ConfigurationLoader;
use crate::envelope::{Envelope, Rendered};
use crate::executor::ProcessExecutor;
use crate::registry::{CommandSource, DefaultCommandRegistry, ListingSource, ManifestSource};
use crate::routing::{RouteTable, Router};

/// Turn an envelope into an HTTP response.
///
/// A rendering failure is logged and answered with a generic 500 so no
/// internal detail reaches the client.
pub fn respond(envelope: &Envelope, data: Option<Value>) -> Response {
    match envelope.json(data) {
        Ok(Rendered { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to render response envelope");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"ok": false, "output": "internal error"})),
            )
                .into_response()
        }
    }
}

/// Assemble the axum application.
pub fn build_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .fallback(invoke)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), access::enforce)),
        )
        .with_state(state)
}

/// Fill a registry from the configured manifest, or from the console's own
/// command listing when no manifest is configured.
pub async fn discover(
    loader: &ConfigurationLoader,
    executor: &ProcessExecutor,
) -> Result<DefaultCommandRegistry> {
    let mut registry = DefaultCommandRegistry::new();

    let count = match loader.manifest_path() {
        Some(path) => ManifestSource::load(&path)
            .and_then(|source| source.register_all(&mut registry))
            .with_context(|| format!("Failed to load command manifest: {}", path.display()))?,
        None => {
            let listing = executor
                .capture_listing()
                .await
                .context("Failed to list console commands")?;
            ListingSource::new(listing)
                .register_all(&mut registry)
                .context("Failed to parse console command listing")?
        }
    };

    tracing::info!(commands = count, "commands discovered");
    Ok(registry)
}

/// Discover commands and generate the route table.
pub async fn build_table(
    loader: &ConfigurationLoader,
    executor: &ProcessExecutor,
    include_hidden: bool,
) -> Result<RouteTable> {
    let registry = discover(loader, executor).await?;
    let mut router = Router::new(loader.config.api.router_config())
        .context("Invalid routing configuration")?;
    router
        .generate(&registry, include_hidden)
        .context("Route generation failed")
}

/// Build the request state from configuration.
pub async fn build_state(loader: &ConfigurationLoader, include_hidden: bool) -> Result<AppState> {
    let executor = ProcessExecutor::new(loader.config.executor.process_config());
    let table = build_table(loader, &executor, include_hidden).await?;
    let access = AccessPolicy::new(&loader.config.trust.ip)
        .context("Invalid trusted IP pattern")?;
    Ok(AppState::new(table, Arc::new(executor), access))
}

/// Bind and serve until interrupted.
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, routes = state.table.len(), "listening");

    axum::serve(
        listener,
        build_app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
