//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&CatalogStore` as the first argument.

pub mod category_repo;
pub mod product_repo;

pub use category_repo::CategoryRepo;
pub use product_repo::ProductRepo;

use storefront_core::error::CoreError;

/// Trim a required display name, rejecting blank input.
pub(crate) fn required_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_field("name", "must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional description; blank input clears it.
pub(crate) fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

pub(crate) fn slug_in_use(slug: &str) -> CoreError {
    CoreError::invalid_field("slug", format!("'{slug}' is already in use"))
}
