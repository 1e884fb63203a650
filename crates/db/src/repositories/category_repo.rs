//! Repository for catalog categories.

use std::collections::HashSet;

use storefront_core::error::CoreError;
use storefront_core::query::{run_query, ListQuery, Page};
use storefront_core::slug::{resolve_slug, validate_slug};
use storefront_core::tree::{build_forest, prune, TreeNode};
use storefront_core::types::DbId;
use validator::Validate;

use crate::models::bulk::BulkResult;
use crate::models::category::{
    Category, CategoryWithProducts, CreateCategory, DeleteMode, PositionUpdate, UpdateCategory,
};
use crate::models::stats::{CatalogStats, ProductStatusCounts};
use crate::models::product::ProductStatus;
use crate::repositories::{normalize_description, required_name, slug_in_use};
use crate::store::{CatalogData, CatalogStore};

const ENTITY: &str = "Category";

/// Provides CRUD, hierarchy and bulk operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// All categories in id order.
    pub async fn list_all(store: &CatalogStore) -> Vec<Category> {
        store.read().await.categories().to_vec()
    }

    /// Filter, search, sort and paginate categories.
    pub async fn list(store: &CatalogStore, query: &ListQuery) -> Page<Category> {
        let data = store.read().await;
        run_query(data.categories(), query)
    }

    pub async fn find_by_id(store: &CatalogStore, id: DbId) -> Option<Category> {
        store.read().await.category(id).cloned()
    }

    pub async fn find_by_slug(store: &CatalogStore, slug: &str) -> Option<Category> {
        store
            .read()
            .await
            .categories()
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
    }

    /// Whether `slug` is free for use, ignoring the category `exclude_id`.
    pub async fn slug_available(store: &CatalogStore, slug: &str, exclude_id: Option<DbId>) -> bool {
        !store.read().await.category_slug_taken(slug, exclude_id)
    }

    /// Create a category, deriving its slug, level and position when absent.
    pub async fn create(store: &CatalogStore, input: &CreateCategory) -> Result<Category, CoreError> {
        input.validate()?;
        let name = required_name(&input.name)?;
        let slug = resolve_slug(input.slug.as_deref(), &name)?;

        let mut data = store.write().await;

        if data.category_slug_taken(&slug, None) {
            return Err(slug_in_use(&slug));
        }
        if let Some(parent_id) = input.parent_id {
            ensure_parent_exists(&data, parent_id)?;
        }
        let level = data.level_under(input.parent_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "ancestor chain of category {:?} loops",
                input.parent_id
            ))
        })?;

        let now = chrono::Utc::now();
        let category = Category {
            id: data.allocate_category_id(),
            name,
            slug,
            description: normalize_description(input.description.as_deref()),
            parent_id: input.parent_id,
            level,
            is_active: input.is_active.unwrap_or(true),
            position: input
                .position
                .unwrap_or_else(|| data.next_position(input.parent_id)),
            created_at: now,
            updated_at: now,
        };
        data.insert_category(category.clone());

        tracing::debug!(category_id = category.id, slug = %category.slug, "Category stored");
        Ok(category)
    }

    /// Merge a patch into an existing category.
    ///
    /// Every check runs before the first write: slug uniqueness, parent
    /// existence and acyclicity. Moving a category recomputes the levels of
    /// its whole subtree.
    pub async fn update(
        store: &CatalogStore,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Category, CoreError> {
        input.validate()?;
        let name = input.name.as_deref().map(required_name).transpose()?;
        let slug = match input.slug.as_deref() {
            Some(s) => {
                let s = s.trim();
                validate_slug(s)?;
                Some(s.to_string())
            }
            None => None,
        };

        let mut data = store.write().await;

        let current = data
            .category(id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        let parent_changed = input
            .parent_id
            .is_some_and(|new_parent| new_parent != current.parent_id);

        if let Some(slug) = slug.as_deref() {
            if data.category_slug_taken(slug, Some(id)) {
                return Err(slug_in_use(slug));
            }
        }
        if let Some(Some(parent_id)) = input.parent_id {
            if parent_id == id {
                return Err(CoreError::Conflict(format!(
                    "Category {id} cannot be its own parent"
                )));
            }
            ensure_parent_exists(&data, parent_id)?;
            if data.would_cycle(id, Some(parent_id)) {
                return Err(CoreError::Conflict(format!(
                    "Moving category {id} under {parent_id} would create a cycle"
                )));
            }
        }

        let next_position = match input.parent_id {
            Some(new_parent) if parent_changed && input.position.is_none() => {
                Some(data.next_position(new_parent))
            }
            _ => None,
        };

        let category = data
            .category_mut(id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(slug) = slug {
            category.slug = slug;
        }
        if let Some(description) = input.description.as_deref() {
            category.description = normalize_description(Some(description));
        }
        if let Some(parent_id) = input.parent_id {
            category.parent_id = parent_id;
        }
        if let Some(is_active) = input.is_active {
            category.is_active = is_active;
        }
        if let Some(position) = input.position.or(next_position) {
            category.position = position;
        }
        category.updated_at = chrono::Utc::now();

        if parent_changed {
            let moved = data.recompute_levels();
            tracing::debug!(category_id = id, levels_changed = moved, "Category re-parented");
        }

        data.category(id)
            .cloned()
            .ok_or_else(|| CoreError::Internal(format!("category {id} vanished during update")))
    }

    /// Delete a category. Returns the ids actually removed (more than one
    /// for [`DeleteMode::Cascade`]).
    pub async fn delete(
        store: &CatalogStore,
        id: DbId,
        mode: DeleteMode,
    ) -> Result<Vec<DbId>, CoreError> {
        let mut data = store.write().await;
        delete_locked(&mut data, id, mode)
    }

    /// Delete several categories, collecting a per-id outcome.
    pub async fn bulk_delete(store: &CatalogStore, ids: &[DbId], mode: DeleteMode) -> BulkResult {
        let mut data = store.write().await;
        let mut result = BulkResult::default();
        for &id in ids {
            match delete_locked(&mut data, id, mode) {
                Ok(_) => result.ok(id),
                Err(e) => result.fail(id, e),
            }
        }
        result
    }

    /// Set `is_active` on several categories, collecting a per-id outcome.
    pub async fn bulk_set_active(store: &CatalogStore, ids: &[DbId], is_active: bool) -> BulkResult {
        let mut data = store.write().await;
        let now = chrono::Utc::now();
        let mut result = BulkResult::default();
        for &id in ids {
            match data.category_mut(id) {
                Some(category) => {
                    category.is_active = is_active;
                    category.updated_at = now;
                    result.ok(id);
                }
                None => result.fail(id, CoreError::NotFound { entity: ENTITY, id }),
            }
        }
        result
    }

    /// Rewrite `position` for exactly the listed categories.
    ///
    /// All-or-nothing: an empty list, a repeated id, a negative position or
    /// any unknown id rejects the whole request. Unlisted categories keep
    /// their positions.
    pub async fn reorder(store: &CatalogStore, orderings: &[PositionUpdate]) -> Result<(), CoreError> {
        if orderings.is_empty() {
            return Err(CoreError::Validation(
                "orderings must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(orderings.len());
        for entry in orderings {
            if !seen.insert(entry.id) {
                return Err(CoreError::invalid_field(
                    "id",
                    format!("category {} appears more than once", entry.id),
                ));
            }
            if entry.position < 0 {
                return Err(CoreError::invalid_field(
                    "position",
                    format!("position for category {} must not be negative", entry.id),
                ));
            }
        }

        let mut data = store.write().await;

        let unknown: Vec<DbId> = orderings
            .iter()
            .map(|e| e.id)
            .filter(|id| data.category(*id).is_none())
            .collect();
        if !unknown.is_empty() {
            return Err(CoreError::Validation(format!(
                "Unknown category ids: {unknown:?}"
            )));
        }

        let now = chrono::Utc::now();
        for entry in orderings {
            if let Some(category) = data.category_mut(entry.id) {
                category.position = entry.position;
                category.updated_at = now;
            }
        }
        Ok(())
    }

    /// Build the category forest. With `active_only`, inactive categories
    /// are dropped together with their subtrees.
    pub async fn tree(store: &CatalogStore, active_only: bool) -> Vec<TreeNode<Category>> {
        let data = store.read().await;
        let forest = build_forest(data.categories());
        if active_only {
            prune(forest.roots, &|c: &Category| c.is_active)
        } else {
            forest.roots
        }
    }

    /// Resolve one category and a page of its products. The category filter
    /// overrides any `category_id` already present in `query`.
    pub async fn with_products(
        store: &CatalogStore,
        id: DbId,
        query: &ListQuery,
    ) -> Result<CategoryWithProducts, CoreError> {
        let data = store.read().await;
        let category = data
            .category(id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        let mut scoped = query.clone();
        scoped.filters.remove("categoryId");
        scoped.filters.insert("category_id".to_string(), id.to_string());

        Ok(CategoryWithProducts {
            category,
            products: run_query(data.products(), &scoped),
        })
    }

    /// Summary counters for the admin dashboard.
    pub async fn stats(store: &CatalogStore) -> CatalogStats {
        let data = store.read().await;
        let categories = data.categories();
        let products = data.products();

        let active_categories = categories.iter().filter(|c| c.is_active).count();
        let mut by_status = ProductStatusCounts::default();
        for product in products {
            match product.status {
                ProductStatus::Active => by_status.active += 1,
                ProductStatus::Draft => by_status.draft += 1,
                ProductStatus::Archived => by_status.archived += 1,
            }
        }

        CatalogStats {
            total_categories: categories.len(),
            active_categories,
            inactive_categories: categories.len() - active_categories,
            root_categories: categories.iter().filter(|c| c.parent_id.is_none()).count(),
            max_depth: categories.iter().map(|c| c.level).max().unwrap_or(0),
            total_products: products.len(),
            uncategorized_products: products.iter().filter(|p| p.category_id.is_none()).count(),
            products_by_status: by_status,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn delete_locked(data: &mut CatalogData, id: DbId, mode: DeleteMode) -> Result<Vec<DbId>, CoreError> {
    if data.category(id).is_none() {
        return Err(CoreError::NotFound { entity: ENTITY, id });
    }

    let child_ids: Vec<DbId> = data.children_of(id).map(|c| c.id).collect();
    let product_count = data.products_in(id).count();

    match mode {
        DeleteMode::Restrict => {
            if !child_ids.is_empty() || product_count > 0 {
                return Err(CoreError::Conflict(format!(
                    "Category {id} has {} child categories and {product_count} products; \
                     reassign or cascade to delete it",
                    child_ids.len()
                )));
            }
            data.remove_category(id);
            Ok(vec![id])
        }
        DeleteMode::Reassign => {
            let now = chrono::Utc::now();
            for child_id in &child_ids {
                if let Some(child) = data.category_mut(*child_id) {
                    child.parent_id = None;
                    child.updated_at = now;
                }
            }
            let detached = data.uncategorize(&[id]);
            data.remove_category(id);
            data.recompute_levels();
            tracing::debug!(
                category_id = id,
                promoted = child_ids.len(),
                detached,
                "Category deleted with reassignment"
            );
            Ok(vec![id])
        }
        DeleteMode::Cascade => {
            let removed = data.subtree_ids(id);
            let detached = data.uncategorize(&removed);
            for category_id in &removed {
                data.remove_category(*category_id);
            }
            tracing::debug!(
                category_id = id,
                removed = removed.len(),
                detached,
                "Category subtree deleted"
            );
            Ok(removed)
        }
    }
}

fn ensure_parent_exists(data: &CatalogData, parent_id: DbId) -> Result<(), CoreError> {
    if data.category(parent_id).is_none() {
        return Err(CoreError::invalid_field(
            "parent_id",
            format!("parent category {parent_id} does not exist"),
        ));
    }
    Ok(())
}

