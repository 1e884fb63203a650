//! Route definitions for products, mounted at `/products`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Product routes.
///
/// ```text
/// GET    /                  -> list_products
/// POST   /                  -> create_product
/// GET    /validate-slug     -> validate_product_slug
/// POST   /bulk-delete       -> bulk_delete_products
/// GET    /{id}              -> get_product
/// PUT    /{id}              -> update_product
/// DELETE /{id}              -> delete_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route("/validate-slug", get(products::validate_product_slug))
        .route("/bulk-delete", post(products::bulk_delete_products))
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}
