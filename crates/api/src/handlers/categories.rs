//! Handlers for categories: CRUD, hierarchy, ordering and bulk operations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use storefront_core::error::CoreError;
use storefront_core::query::{DEFAULT_CATEGORY_LIMIT, DEFAULT_PRODUCT_LIMIT};
use storefront_db::models::bulk::BulkResult;
use storefront_db::models::category::{CreateCategory, PositionUpdate, UpdateCategory};
use storefront_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::query::{
    parse_id, parse_optional_id, require_ids, BulkDeleteRequest, BulkStatusRequest,
    DeleteParams, ListParams, SlugCheckParams, TreeParams,
};
use crate::response::{DataResponse, SlugAvailability};
use crate::state::AppState;

const ENTITY: &str = "Category";

// ---------------------------------------------------------------------------
// Listing and lookup
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// Paginated list with search, sort and exact-match filters.
pub async fn list_categories(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query(DEFAULT_CATEGORY_LIMIT);
    let page = CategoryRepo::list(&state.store, &query).await;

    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let category = CategoryRepo::find_by_id(&state.store, id)
        .await
        .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

    Ok(Json(DataResponse::new(category)))
}

/// GET /api/v1/categories/slug/{slug}
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.store, &slug)
        .await
        .ok_or_else(|| CoreError::NotFoundBy {
            entity: ENTITY,
            key: slug.clone(),
        })?;

    Ok(Json(DataResponse::new(category)))
}

/// GET /api/v1/categories/{id}/products
///
/// The category plus one page of its products. Accepts the same list
/// parameters as `GET /products`.
pub async fn get_category_products(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let query = params.into_query(DEFAULT_PRODUCT_LIMIT);
    let result = CategoryRepo::with_products(&state.store, id, &query).await?;

    Ok(Json(DataResponse::new(result)))
}

/// GET /api/v1/categories/tree
///
/// Category forest ordered by position. `active_only=true` drops inactive
/// categories together with their descendants.
pub async fn get_category_tree(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TreeParams>,
) -> AppResult<impl IntoResponse> {
    let tree = CategoryRepo::tree(&state.store, params.active_only).await;

    Ok(Json(DataResponse::new(tree)))
}

/// GET /api/v1/categories/stats
pub async fn get_catalog_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = CategoryRepo::stats(&state.store).await;

    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/v1/categories/validate-slug
///
/// Reports whether `slug` is free, ignoring the category `exclude_id` so
/// an edit form can re-submit its own slug.
pub async fn validate_category_slug(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SlugCheckParams>,
) -> AppResult<impl IntoResponse> {
    let exclude_id = parse_optional_id(params.exclude_id.as_deref(), "exclude_id")?;
    let slug = params.slug.trim().to_string();
    let available = CategoryRepo::slug_available(&state.store, &slug, exclude_id).await;

    Ok(Json(DataResponse::new(SlugAvailability { slug, available })))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::create(&state.store, &input).await?;

    tracing::info!(
        category_id = category.id,
        slug = %category.slug,
        parent_id = ?category.parent_id,
        "Category created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(category).with_message("Category created")),
    ))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let category = CategoryRepo::update(&state.store, id, &input).await?;

    tracing::info!(category_id = id, level = category.level, "Category updated");

    Ok(Json(
        DataResponse::new(category).with_message("Category updated"),
    ))
}

/// DELETE /api/v1/categories/{id}?mode=restrict|reassign|cascade
///
/// Restrict (the default) refuses when the category still has children or
/// products.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "id")?;
    let removed = CategoryRepo::delete(&state.store, id, params.mode).await?;

    tracing::info!(category_id = id, mode = ?params.mode, removed = removed.len(), "Category deleted");

    let summary = BulkResult {
        succeeded: removed,
        failed: Vec::new(),
    };
    Ok(Json(
        DataResponse::new(summary).with_message("Category deleted"),
    ))
}

/// PUT /api/v1/categories/reorder
///
/// Body is a bare array of `{id, position}`. Either every entry applies or
/// none does.
pub async fn reorder_categories(
    State(state): State<AppState>,
    AppJson(orderings): AppJson<Vec<PositionUpdate>>,
) -> AppResult<impl IntoResponse> {
    CategoryRepo::reorder(&state.store, &orderings).await?;

    tracing::info!(count = orderings.len(), "Categories reordered");

    Ok(Json(
        DataResponse::new(()).with_message("Categories reordered"),
    ))
}

/// POST /api/v1/categories/bulk-delete
pub async fn bulk_delete_categories(
    State(state): State<AppState>,
    AppJson(input): AppJson<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    require_ids(&input.ids)?;
    let result = CategoryRepo::bulk_delete(&state.store, &input.ids, input.mode).await;

    tracing::info!(
        requested = input.ids.len(),
        deleted = result.succeeded.len(),
        failed = result.failed.len(),
        mode = ?input.mode,
        "Bulk category delete",
    );

    let message = bulk_message("deleted", &result);
    Ok(Json(DataResponse::new(result).with_message(message)))
}

/// POST /api/v1/categories/bulk-status
pub async fn bulk_set_category_status(
    State(state): State<AppState>,
    AppJson(input): AppJson<BulkStatusRequest>,
) -> AppResult<impl IntoResponse> {
    require_ids(&input.ids)?;
    let result = CategoryRepo::bulk_set_active(&state.store, &input.ids, input.is_active).await;

    tracing::info!(
        requested = input.ids.len(),
        updated = result.succeeded.len(),
        is_active = input.is_active,
        "Bulk category status change",
    );

    let message = bulk_message("updated", &result);
    Ok(Json(DataResponse::new(result).with_message(message)))
}

/// Human-readable summary line for a bulk outcome.
pub(crate) fn bulk_message(verb: &str, result: &BulkResult) -> String {
    if result.is_complete() {
        format!("{} item(s) {verb}", result.succeeded.len())
    } else {
        format!(
            "{} item(s) {verb}, {} failed",
            result.succeeded.len(),
            result.failed.len()
        )
    }
}
