//! Catalog summary counters for the admin dashboard.

use serde::Serialize;

/// Product counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductStatusCounts {
    pub active: usize,
    pub draft: usize,
    pub archived: usize,
}

/// Snapshot of catalog size and shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_categories: usize,
    pub active_categories: usize,
    pub inactive_categories: usize,
    pub root_categories: usize,
    /// Deepest `level` present, 0 for an empty or flat catalog.
    pub max_depth: i32,
    pub total_products: usize,
    pub uncategorized_products: usize,
    pub products_by_status: ProductStatusCounts,
}
