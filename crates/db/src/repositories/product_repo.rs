//! Repository for catalog products.

use storefront_core::error::CoreError;
use storefront_core::query::{run_query, ListQuery, Page};
use storefront_core::slug::{resolve_slug, validate_slug};
use storefront_core::types::DbId;
use validator::Validate;

use crate::models::bulk::BulkResult;
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::repositories::{normalize_description, required_name, slug_in_use};
use crate::store::{CatalogData, CatalogStore};

const ENTITY: &str = "Product";

/// Provides CRUD and bulk operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// All products in id order.
    pub async fn list_all(store: &CatalogStore) -> Vec<Product> {
        store.read().await.products().to_vec()
    }

    /// Filter, search, sort and paginate products.
    pub async fn list(store: &CatalogStore, query: &ListQuery) -> Page<Product> {
        let data = store.read().await;
        run_query(data.products(), query)
    }

    pub async fn find_by_id(store: &CatalogStore, id: DbId) -> Option<Product> {
        store.read().await.product(id).cloned()
    }

    /// Whether `slug` is free for use, ignoring the product `exclude_id`.
    pub async fn slug_available(store: &CatalogStore, slug: &str, exclude_id: Option<DbId>) -> bool {
        !store.read().await.product_slug_taken(slug, exclude_id)
    }

    /// Create a product. New products are drafts unless a status is given.
    pub async fn create(store: &CatalogStore, input: &CreateProduct) -> Result<Product, CoreError> {
        input.validate()?;
        let name = required_name(&input.name)?;
        let slug = resolve_slug(input.slug.as_deref(), &name)?;
        validate_price(input.price)?;

        let mut data = store.write().await;

        if data.product_slug_taken(&slug, None) {
            return Err(slug_in_use(&slug));
        }
        if let Some(category_id) = input.category_id {
            ensure_category_exists(&data, category_id)?;
        }

        let now = chrono::Utc::now();
        let product = Product {
            id: data.allocate_product_id(),
            name,
            slug,
            description: normalize_description(input.description.as_deref()),
            price: input.price,
            category_id: input.category_id,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        data.insert_product(product.clone());

        tracing::debug!(product_id = product.id, slug = %product.slug, "Product stored");
        Ok(product)
    }

    /// Merge a patch into an existing product. All checks run before the
    /// first write.
    pub async fn update(
        store: &CatalogStore,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Product, CoreError> {
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
        if let Some(price) = input.price {
            validate_price(price)?;
        }

        let mut data = store.write().await;

        if data.product(id).is_none() {
            return Err(CoreError::NotFound { entity: ENTITY, id });
        }
        if let Some(slug) = slug.as_deref() {
            if data.product_slug_taken(slug, Some(id)) {
                return Err(slug_in_use(slug));
            }
        }
        if let Some(Some(category_id)) = input.category_id {
            ensure_category_exists(&data, category_id)?;
        }

        let product = data
            .product_mut(id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        if let Some(name) = name {
            product.name = name;
        }
        if let Some(slug) = slug {
            product.slug = slug;
        }
        if let Some(description) = input.description.as_deref() {
            product.description = normalize_description(Some(description));
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(category_id) = input.category_id {
            product.category_id = category_id;
        }
        if let Some(status) = input.status {
            product.status = status;
        }
        product.updated_at = chrono::Utc::now();

        Ok(product.clone())
    }

    /// Delete a product, returning the removed row.
    pub async fn delete(store: &CatalogStore, id: DbId) -> Result<Product, CoreError> {
        store
            .write()
            .await
            .remove_product(id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Delete several products, collecting a per-id outcome.
    pub async fn bulk_delete(store: &CatalogStore, ids: &[DbId]) -> BulkResult {
        let mut data = store.write().await;
        let mut result = BulkResult::default();
        for &id in ids {
            match data.remove_product(id) {
                Some(_) => result.ok(id),
                None => result.fail(id, CoreError::NotFound { entity: ENTITY, id }),
            }
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::invalid_field(
            "price",
            "must be a finite, non-negative amount",
        ));
    }
    Ok(())
}

fn ensure_category_exists(data: &CatalogData, category_id: DbId) -> Result<(), CoreError> {
    if data.category(category_id).is_none() {
        return Err(CoreError::invalid_field(
            "category_id",
            format!("category {category_id} does not exist"),
        ));
    }
    Ok(())
}

