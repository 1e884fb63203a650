use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Catalog store shared by every request in the process.
    pub store: storefront_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
