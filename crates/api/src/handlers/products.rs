//! Handlers for products.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_core::query::DEFAULT_PRODUCT_LIMIT;
use storefront_core::types::DbId;
use storefront_db::models::bulk::BulkResult;
use storefront_db::models::product::{CreateProduct, UpdateProduct};
use storefront_db::repositories::ProductRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::handlers::categories::bulk_message;
use crate::query::{parse_id, parse_optional_id, require_ids, ListParams, SlugCheckParams};
use crate::response::{DataResponse, SlugAvailability};
use crate::state::AppState;

const ENTITY: &str = "Product";

/// Request body for `POST /products/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkProductDeleteRequest {
    pub ids: Vec<DbId>,
}

/// GET /api/v1/products
///
/// Paginated list. Searches name, slug and description; any extra query key
/// (`status`, `category_id`, ...) is an exact-match filter.
pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query(DEFAULT_PRODUCT_LIMIT);
    let page = ProductRepo::list(&state.store, &query).await;

    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let product = ProductRepo::find_by_id(&state.store, id)
        .await
        .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

    Ok(Json(DataResponse::new(product)))
}

/// GET /api/v1/products/validate-slug
pub async fn validate_product_slug(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SlugCheckParams>,
) -> AppResult<impl IntoResponse> {
    let exclude_id = parse_optional_id(params.exclude_id.as_deref(), "exclude_id")?;
    let slug = params.slug.trim().to_string();
    let available = ProductRepo::slug_available(&state.store, &slug, exclude_id).await;

    Ok(Json(DataResponse::new(SlugAvailability { slug, available })))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::create(&state.store, &input).await?;

    tracing::info!(
        product_id = product.id,
        slug = %product.slug,
        category_id = ?product.category_id,
        "Product created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(product).with_message("Product created")),
    ))
}

/// PUT /api/v1/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let product = ProductRepo::update(&state.store, id, &input).await?;

    tracing::info!(product_id = id, "Product updated");

    Ok(Json(DataResponse::new(product).with_message("Product updated")))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let product = ProductRepo::delete(&state.store, id).await?;

    tracing::info!(product_id = id, slug = %product.slug, "Product deleted");

    let summary = BulkResult {
        succeeded: vec![product.id],
        failed: Vec::new(),
    };
    Ok(Json(DataResponse::new(summary).with_message("Product deleted")))
}

/// POST /api/v1/products/bulk-delete
pub async fn bulk_delete_products(
    State(state): State<AppState>,
    AppJson(input): AppJson<BulkProductDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    require_ids(&input.ids)?;
    let result = ProductRepo::bulk_delete(&state.store, &input.ids).await;

    tracing::info!(
        requested = input.ids.len(),
        deleted = result.succeeded.len(),
        failed = result.failed.len(),
        "Bulk product delete",
    );

    let message = bulk_message("deleted", &result);
    Ok(Json(DataResponse::new(result).with_message(message)))
}
