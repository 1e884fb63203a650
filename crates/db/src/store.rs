//! In-memory catalog collections.
//!
//! Both collections are kept in ascending id order, which is also insertion
//! order, so lookups use binary search and listings default to id order.

use storefront_core::tree::{creates_cycle, depth_under};
use storefront_core::types::DbId;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::category::Category;
use crate::models::product::Product;

/// The raw collections guarded by [`CatalogStore`].
#[derive(Debug)]
pub struct CatalogData {
    categories: Vec<Category>,
    products: Vec<Product>,
    next_category_id: DbId,
    next_product_id: DbId,
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            products: Vec::new(),
            next_category_id: 1,
            next_product_id: 1,
        }
    }
}

impl CatalogData {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    // -- categories ----------------------------------------------------------

    pub(crate) fn category_index(&self, id: DbId) -> Option<usize> {
        self.categories.binary_search_by_key(&id, |c| c.id).ok()
    }

    pub fn category(&self, id: DbId) -> Option<&Category> {
        self.category_index(id).map(|i| &self.categories[i])
    }

    pub(crate) fn category_mut(&mut self, id: DbId) -> Option<&mut Category> {
        self.category_index(id).map(|i| &mut self.categories[i])
    }

    pub fn parent_of(&self, id: DbId) -> Option<DbId> {
        self.category(id).and_then(|c| c.parent_id)
    }

    pub fn children_of(&self, id: DbId) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |c| c.parent_id == Some(id))
    }

    pub fn category_slug_taken(&self, slug: &str, exclude_id: Option<DbId>) -> bool {
        self.categories
            .iter()
            .any(|c| c.slug == slug && Some(c.id) != exclude_id)
    }

    /// Whether moving `id` under `new_parent` would make it its own ancestor.
    pub fn would_cycle(&self, id: DbId, new_parent: Option<DbId>) -> bool {
        creates_cycle(id, new_parent, |c| self.parent_of(c))
    }

    /// Depth a category would have under `parent`. `None` when the ancestor
    /// chain of `parent` loops.
    pub fn level_under(&self, parent: Option<DbId>) -> Option<i32> {
        depth_under(parent, |c| self.parent_of(c))
    }

    /// Next free sibling position under `parent`.
    pub fn next_position(&self, parent: Option<DbId>) -> i32 {
        self.categories
            .iter()
            .filter(|c| c.parent_id == parent)
            .map(|c| c.position)
            .max()
            .map_or(0, |p| p.saturating_add(1))
    }

    pub(crate) fn allocate_category_id(&mut self) -> DbId {
        let id = self.next_category_id;
        self.next_category_id += 1;
        id
    }

    pub(crate) fn insert_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub(crate) fn remove_category(&mut self, id: DbId) -> Option<Category> {
        self.category_index(id).map(|i| self.categories.remove(i))
    }

    /// Ids of `root` and all of its descendants, breadth-first.
    pub fn subtree_ids(&self, root: DbId) -> Vec<DbId> {
        let mut out = vec![root];
        let mut cursor = 0;
        while cursor < out.len() {
            let current = out[cursor];
            for child in self.children_of(current) {
                if !out.contains(&child.id) {
                    out.push(child.id);
                }
            }
            cursor += 1;
        }
        out
    }

    /// Recompute every `level` from the parent chain. Returns the number of
    /// categories whose level changed.
    pub(crate) fn recompute_levels(&mut self) -> usize {
        let levels: Vec<Option<i32>> = self
            .categories
            .iter()
            .map(|c| self.level_under(c.parent_id))
            .collect();

        let mut changed = 0;
        for (category, level) in self.categories.iter_mut().zip(levels) {
            let Some(level) = level else {
                tracing::error!(
                    category_id = category.id,
                    "Ancestor chain loops; keeping stored level"
                );
                continue;
            };
            if category.level != level {
                category.level = level;
                changed += 1;
            }
        }
        changed
    }

    // -- products ------------------------------------------------------------

    pub(crate) fn product_index(&self, id: DbId) -> Option<usize> {
        self.products.binary_search_by_key(&id, |p| p.id).ok()
    }

    pub fn product(&self, id: DbId) -> Option<&Product> {
        self.product_index(id).map(|i| &self.products[i])
    }

    pub(crate) fn product_mut(&mut self, id: DbId) -> Option<&mut Product> {
        self.product_index(id).map(|i| &mut self.products[i])
    }

    pub fn product_slug_taken(&self, slug: &str, exclude_id: Option<DbId>) -> bool {
        self.products
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id)
    }

    pub fn products_in(&self, category_id: DbId) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| p.category_id == Some(category_id))
    }

    pub(crate) fn allocate_product_id(&mut self) -> DbId {
        let id = self.next_product_id;
        self.next_product_id += 1;
        id
    }

    pub(crate) fn insert_product(&mut self, product: Product) {
        self.products.push(product);
    }

    pub(crate) fn remove_product(&mut self, id: DbId) -> Option<Product> {
        self.product_index(id).map(|i| self.products.remove(i))
    }

    /// Detach every product assigned to one of `category_ids`. Returns the
    /// number of products touched.
    pub(crate) fn uncategorize(&mut self, category_ids: &[DbId]) -> usize {
        let now = chrono::Utc::now();
        let mut touched = 0;
        for product in &mut self.products {
            if product
                .category_id
                .is_some_and(|c| category_ids.contains(&c))
            {
                product.category_id = None;
                product.updated_at = now;
                touched += 1;
            }
        }
        touched
    }

    #[cfg(test)]
    pub(crate) fn categories_mut(&mut self) -> &mut Vec<Category> {
        &mut self.categories
    }
}

/// Process-wide catalog state.
///
/// Every mutation takes the write guard for its whole validate-then-apply
/// sequence, so no partially applied change is ever observable.
#[derive(Debug, Default)]
pub struct CatalogStore {
    data: RwLock<CatalogData>,
}

impl CatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, CatalogData> {
        self.data.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, CatalogData> {
        self.data.write().await
    }
}
