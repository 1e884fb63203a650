//! Shared query parameter and request body types for API handlers.
//!
//! Raw query strings are decoded into these typed structs at the boundary
//! and normalized before anything reaches the repositories.

use std::collections::BTreeMap;

use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_core::query::{normalize_limit, normalize_page, ListQuery, SortOrder};
use storefront_core::types::DbId;
use storefront_db::models::category::DeleteMode;

/// List parameters (`?page=&limit=&search=&sort_by=&sort_order=&<field>=`).
///
/// Every key that is not one of the named parameters is treated as an
/// exact-match filter. Values stay strings here so malformed paging input
/// can be normalized instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Normalize into a [`ListQuery`] using `default_limit` when `limit` is
    /// missing or invalid.
    pub fn into_query(self, default_limit: usize) -> ListQuery {
        ListQuery {
            page: normalize_page(self.page.as_deref()),
            limit: normalize_limit(self.limit.as_deref(), default_limit),
            search: self.search.filter(|s| !s.trim().is_empty()),
            sort_by: self.sort_by.filter(|s| !s.trim().is_empty()),
            sort_order: SortOrder::parse_lenient(self.sort_order.as_deref()),
            filters: self.filters,
        }
    }
}

/// Slug availability parameters (`?slug=&exclude_id=`).
#[derive(Debug, Deserialize)]
pub struct SlugCheckParams {
    pub slug: String,
    #[serde(alias = "excludeId")]
    pub exclude_id: Option<String>,
}

/// Category delete parameters (`?mode=restrict|reassign|cascade`).
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub mode: DeleteMode,
}

/// Category tree parameters (`?active_only=true`).
#[derive(Debug, Default, Deserialize)]
pub struct TreeParams {
    #[serde(default, alias = "activeOnly")]
    pub active_only: bool,
}

/// Request body for bulk deletes.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
    #[serde(default)]
    pub mode: DeleteMode,
}

/// Request body for bulk activation/deactivation.
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<DbId>,
    pub is_active: bool,
}

/// Parse a path or query id, rejecting anything that is not a positive integer.
pub fn parse_id(raw: &str, field: &str) -> Result<DbId, CoreError> {
    raw.trim()
        .parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::invalid_field(field, format!("'{raw}' is not a valid id")))
}

/// Parse an optional id parameter; blank counts as absent.
pub fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<DbId>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value, field).map(Some),
    }
}

/// Reject an empty id list.
pub fn require_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::invalid_field("ids", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => params.page = value,
                "limit" => params.limit = value,
                "search" => params.search = value,
                "sort_by" => params.sort_by = value,
                "sort_order" => params.sort_order = value,
                other => {
                    params.filters.insert(other.to_string(), value.unwrap_or_default());
                }
            }
        }
        params
    }

    #[test]
    fn invalid_paging_is_normalized() {
        let query = params(&[("page", "abc"), ("limit", "-4")]).into_query(20);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn remaining_keys_become_filters() {
        let query = params(&[("status", "active"), ("sort_order", "desc"), ("sort_by", "price")])
            .into_query(10);
        assert_eq!(query.filters.get("status").map(String::as_str), Some("active"));
        assert_eq!(query.sort_by.as_deref(), Some("price"));
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = params(&[("search", "  ")]).into_query(10);
        assert_eq!(query.search, None);
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42", "id").unwrap(), 42);
        assert_matches!(
            parse_id("abc", "id"),
            Err(CoreError::InvalidField { field, .. }) if field == "id"
        );
        assert!(parse_id("0", "id").is_err());
        assert!(parse_id("1.5", "id").is_err());
    }

    #[test]
    fn optional_id_treats_blank_as_absent() {
        assert_eq!(parse_optional_id(None, "exclude_id").unwrap(), None);
        assert_eq!(parse_optional_id(Some(" "), "exclude_id").unwrap(), None);
        assert_eq!(parse_optional_id(Some("7"), "exclude_id").unwrap(), Some(7));
        assert!(parse_optional_id(Some("x"), "exclude_id").is_err());
    }

    #[test]
    fn empty_id_list_rejected() {
        assert!(require_ids(&[]).is_err());
        assert!(require_ids(&[1]).is_ok());
    }
}
