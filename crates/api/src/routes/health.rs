use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the catalog store is readable.
    pub store_healthy: bool,
    /// Whether the store was seeded with the demo catalog at startup.
    pub demo_data: bool,
    pub categories: usize,
    pub products: usize,
}

/// GET /health -- returns service status and catalog sizes.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = storefront_db::health_check(&state.store).await.is_ok();
    let (categories, products) = {
        let data = state.store.read().await;
        (data.categories().len(), data.products().len())
    };

    Json(HealthResponse {
        status: if store_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        demo_data: state.config.seed_demo_data,
        categories,
        products,
    })
}

/// Mount health check routes (root level, outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
