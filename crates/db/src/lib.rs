//! Catalog storage layer.
//!
//! [`CatalogStore`] owns the canonical category and product collections.
//! Repositories in [`repositories`] are zero-sized structs whose async
//! methods take `&CatalogStore` as the first argument, validate, and then
//! mutate under a single write guard.

pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use store::CatalogStore;

/// Shared handle to the catalog store.
pub type DbPool = std::sync::Arc<CatalogStore>;

/// Create an empty store, optionally loaded with the demo catalog.
pub async fn create_pool(seed_demo_data: bool) -> Result<DbPool, storefront_core::error::CoreError> {
    let store = std::sync::Arc::new(CatalogStore::new());
    if seed_demo_data {
        seed::seed_demo_catalog(&store).await?;
    }
    Ok(store)
}

/// Verify the store can be read.
pub async fn health_check(store: &CatalogStore) -> Result<(), storefront_core::error::CoreError> {
    let data = store.read().await;
    tracing::trace!(
        categories = data.categories().len(),
        products = data.products().len(),
        "Catalog store health check"
    );
    Ok(())
}
