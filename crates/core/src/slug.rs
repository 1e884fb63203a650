//! Slug generation and validation for catalog entities.
//!
//! Slugs are the URL-safe identifiers used by storefront routes
//! (`/category/{slug}`, `/product/{slug}`).

use crate::error::CoreError;

/// Maximum slug length in bytes.
pub const MAX_SLUG_LEN: usize = 120;

/// Generate a URL-safe slug from a display name.
///
/// Converts to lowercase, replaces anything that is not an ASCII
/// alphanumeric with a hyphen, collapses consecutive hyphens, and trims
/// leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use storefront_core::slug::generate_slug;
///
/// assert_eq!(generate_slug("Premium Wireless Headphones"), "premium-wireless-headphones");
/// assert_eq!(generate_slug("  Shoes & Boots! "), "shoes-boots");
/// ```
pub fn generate_slug(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_hyphen = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    let trimmed = result.trim_matches('-');
    if trimmed.len() > MAX_SLUG_LEN {
        trimmed[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validate a slug: non-empty, bounded, lowercase alphanumerics separated by
/// single hyphens, no leading or trailing hyphen.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::invalid_field("slug", "must not be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::invalid_field(
            "slug",
            format!("must be at most {MAX_SLUG_LEN} characters"),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::invalid_field(
            "slug",
            "must contain only lowercase alphanumeric characters and hyphens",
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::invalid_field(
            "slug",
            "hyphens must separate words",
        ));
    }
    Ok(())
}

/// Resolve the slug for a new or renamed entity.
///
/// An explicit slug is validated as-is; otherwise one is derived from the
/// name. A name with no usable characters yields a validation error.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CoreError> {
    let slug = match explicit {
        Some(s) => s.trim().to_string(),
        None => generate_slug(name),
    };
    validate_slug(&slug)?;
    Ok(slug)
}
