//! Route definitions for categories, mounted at `/categories`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes.
///
/// Static segments are registered alongside `/{id}`; axum prefers the
/// static match, so `/tree` never reaches the id parser.
///
/// ```text
/// GET    /                  -> list_categories
/// POST   /                  -> create_category
/// GET    /tree              -> get_category_tree
/// GET    /stats             -> get_catalog_stats
/// GET    /validate-slug     -> validate_category_slug
/// PUT    /reorder           -> reorder_categories
/// POST   /bulk-delete       -> bulk_delete_categories
/// POST   /bulk-status       -> bulk_set_category_status
/// GET    /slug/{slug}       -> get_category_by_slug
/// GET    /{id}              -> get_category
/// PUT    /{id}              -> update_category
/// DELETE /{id}              -> delete_category
/// GET    /{id}/products     -> get_category_products
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/tree", get(categories::get_category_tree))
        .route("/stats", get(categories::get_catalog_stats))
        .route("/validate-slug", get(categories::validate_category_slug))
        .route("/reorder", put(categories::reorder_categories))
        .route("/bulk-delete", post(categories::bulk_delete_categories))
        .route("/bulk-status", post(categories::bulk_set_category_status))
        .route("/slug/{slug}", get(categories::get_category_by_slug))
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/{id}/products", get(categories::get_category_products))
}
