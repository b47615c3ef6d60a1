//! Shared, read-only request state.

use std::sync::Arc;

use super::AccessPolicy;
use crate::executor::CommandExecutor;
use crate::routing::RouteTable;

/// State handed to every request.
///
/// Everything is built once at startup and never mutated; requests only
/// read through the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Generated routes and the commands they expose.
    pub table: Arc<RouteTable>,
    /// Runs the resolved command.
    pub executor: Arc<dyn CommandExecutor>,
    /// Client address allow-list.
    pub access: Arc<AccessPolicy>,
}

impl AppState {
    /// Bundle the startup products into request state.
    pub fn new(
        table: RouteTable,
        executor: Arc<dyn CommandExecutor>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            table: Arc::new(table),
            executor,
            access: Arc::new(access),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("routes", &self.table.len())
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}
