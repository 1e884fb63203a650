pub mod categories;
pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                      list, create
/// /categories/tree                                 forest (?active_only)
/// /categories/stats                                catalog statistics
/// /categories/validate-slug                        slug availability
/// /categories/reorder                              reorder (PUT)
/// /categories/bulk-delete                          bulk delete (POST)
/// /categories/bulk-status                          bulk activate/deactivate (POST)
/// /categories/slug/{slug}                          get by slug
/// /categories/{id}                                 get, update, delete (?mode)
/// /categories/{id}/products                        category with its products
///
/// /products                                        list, create
/// /products/validate-slug                          slug availability
/// /products/bulk-delete                            bulk delete (POST)
/// /products/{id}                                   get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/products", products::router())
}
