//! In-memory list query engine: filter, search, sort, paginate.
//!
//! The engine works on any read view of entities implementing [`Queryable`],
//! so the same code serves categories, products, and any later collection.
//! It never mutates its input.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// First page number (pages are 1-indexed).
pub const DEFAULT_PAGE: usize = 1;

/// Default page size for category listings.
pub const DEFAULT_CATEGORY_LIMIT: usize = 20;

/// Default page size for product listings.
pub const DEFAULT_PRODUCT_LIMIT: usize = 10;

/// Upper bound on any requested page size.
pub const MAX_LIMIT: usize = 100;

/// Normalize a raw `page` value. Non-numeric or non-positive input falls
/// back to [`DEFAULT_PAGE`].
pub fn normalize_page(raw: Option<&str>) -> usize {
    parse_positive(raw).unwrap_or(DEFAULT_PAGE)
}

/// Normalize a raw `limit` value. Non-numeric or non-positive input falls
/// back to `default`; oversized values are clamped to [`MAX_LIMIT`].
pub fn normalize_limit(raw: Option<&str>, default: usize) -> usize {
    parse_positive(raw).unwrap_or(default).min(MAX_LIMIT)
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// Query value object
// ---------------------------------------------------------------------------

/// Sort direction. Anything other than `desc` is treated as ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// A single list request, already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    /// Field name -> raw value. Every entry is an AND predicate.
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// First page with the given page size and no predicates.
    pub fn new(limit: usize) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: limit.clamp(1, MAX_LIMIT),
            search: None,
            sort_by: None,
            sort_order: SortOrder::Asc,
            filters: BTreeMap::new(),
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Index of the first item on the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the filtered set before pagination.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl<T> Page<T> {
    /// Number of pages needed to show `total` items.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.limit.max(1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// A borrowed field value used for filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// A known optional field with no value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Whether this value satisfies a raw filter value from a query string.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match *self {
            FieldValue::Null => raw.is_empty() || raw.eq_ignore_ascii_case("null"),
            FieldValue::Bool(v) => parse_bool(raw) == Some(v),
            FieldValue::Int(v) => raw.parse::<i64>().is_ok_and(|r| r == v),
            FieldValue::Float(v) => raw.parse::<f64>().is_ok_and(|r| r == v),
            FieldValue::Text(v) => v == raw,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Int(_) | FieldValue::Float(_) => 2,
            FieldValue::Text(_) => 3,
        }
    }

    /// Total order used by the sorter. Null sorts first; text compares
    /// case-insensitively.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (*self, *other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(&b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(&b),
            (FieldValue::Int(a), FieldValue::Float(b)) => (a as f64).total_cmp(&b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.total_cmp(&(b as f64)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(&b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// Read access the query engine needs from an entity.
pub trait Queryable {
    /// Value of a filterable/sortable field, or `None` if the entity has no
    /// field by that name. Implementations should accept both `snake_case`
    /// and `camelCase` spellings.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// The fixed set of textual fields searched by `search`.
    fn search_text(&self) -> Vec<&str>;
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

fn matches_search<T: Queryable>(item: &T, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => item
            .search_text()
            .iter()
            .any(|text| text.to_lowercase().contains(needle)),
    }
}

fn matches_filters<T: Queryable>(item: &T, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(key, raw)| match item.field(key) {
        Some(value) => value.matches(raw),
        None => true,
    })
}

fn compare_field<T: Queryable>(a: &T, b: &T, key: &str) -> Ordering {
    match (a.field(key), b.field(key)) {
        (Some(x), Some(y)) => x.compare(&y),
        _ => Ordering::Equal,
    }
}

/// Run a list query over a read view of `items`.
///
/// Items are filtered (search + filters), stably sorted when `sort_by` names
/// a known field, then sliced to the requested page. `total` counts the
/// filtered set. Input order is the tie-breaker and the default order.
pub fn run_query<T: Queryable + Clone>(items: &[T], query: &ListQuery) -> Page<T> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(*item, needle.as_deref()))
        .filter(|item| matches_filters(*item, &query.filters))
        .collect();

    if let Some(key) = query.sort_by.as_deref() {
        match query.sort_order {
            SortOrder::Asc => matched.sort_by(|a, b| compare_field(*a, *b, key)),
            SortOrder::Desc => matched.sort_by(|a, b| compare_field(*b, *a, key)),
        }
    }

    let total = matched.len();
    let items = matched
        .into_iter()
        .skip(query.offset())
        .take(query.limit)
        .cloned()
        .collect();

    Page {
        items,
        total,
        page: query.page,
        limit: query.limit,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        id: i64,
        name: &'static str,
        group: Option<i64>,
        rank: i64,
        price: f64,
        enabled: bool,
    }

    impl Queryable for Item {
        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            Some(match name {
                "id" => FieldValue::Int(self.id),
                "name" => FieldValue::Text(self.name),
                "group" | "groupId" => self.group.map_or(FieldValue::Null, FieldValue::Int),
                "rank" => FieldValue::Int(self.rank),
                "price" => FieldValue::Float(self.price),
                "enabled" => FieldValue::Bool(self.enabled),
                _ => return None,
            })
        }

        fn search_text(&self) -> Vec<&str> {
            vec![self.name]
        }
    }

    fn item(id: i64, name: &'static str, group: Option<i64>, rank: i64) -> Item {
        Item {
            id,
            name,
            group,
            rank,
            price: id as f64 * 1.5,
            enabled: id % 2 == 0,
        }
    }

    fn fixture() -> Vec<Item> {
        vec![
            item(1, "Alpha", Some(1), 3),
            item(2, "beta", Some(1), 1),
            item(3, "Gamma", None, 3),
            item(4, "delta", Some(2), 1),
            item(5, "Alphabet", Some(2), 3),
        ]
    }

    fn ids(page: &Page<Item>) -> Vec<i64> {
        page.items.iter().map(|i| i.id).collect()
    }

    // -- normalization -------------------------------------------------------

    #[test]
    fn page_defaults_when_missing_or_invalid() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some("abc")), 1);
        assert_eq!(normalize_page(Some("0")), 1);
        assert_eq!(normalize_page(Some("-3")), 1);
        assert_eq!(normalize_page(Some(" 4 ")), 4);
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_limit(None, 20), 20);
        assert_eq!(normalize_limit(Some("x"), 10), 10);
        assert_eq!(normalize_limit(Some("0"), 10), 10);
        assert_eq!(normalize_limit(Some("5"), 10), 5);
        assert_eq!(normalize_limit(Some("5000"), 10), MAX_LIMIT);
    }

    #[test]
    fn sort_order_is_lenient() {
        assert_eq!(SortOrder::parse_lenient(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient(None), SortOrder::Asc);
    }

    // -- pagination ----------------------------------------------------------

    #[test]
    fn page_length_matches_remaining_items() {
        let items: Vec<Item> = (1..=23).map(|i| item(i, "x", None, 0)).collect();
        for limit in [1, 5, 7, 10, 23, 50] {
            for page in 1..=6 {
                let result = run_query(&items, &ListQuery::new(limit).page(page));
                let remaining = result.total.saturating_sub((page - 1) * limit);
                assert_eq!(result.total, 23);
                assert!(result.items.len() <= limit);
                assert_eq!(result.items.len(), limit.min(remaining));
            }
        }
    }

    #[test]
    fn second_page_continues_first() {
        let items = fixture();
        let first = run_query(&items, &ListQuery::new(2));
        let second = run_query(&items, &ListQuery::new(2).page(2));
        let third = run_query(&items, &ListQuery::new(2).page(3));
        assert_eq!(ids(&first), vec![1, 2]);
        assert_eq!(ids(&second), vec![3, 4]);
        assert_eq!(ids(&third), vec![5]);
        assert_eq!(first.total_pages(), 3);
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn search_is_case_insensitive_substring() {
        let result = run_query(&fixture(), &ListQuery::new(10).search("ALPHA"));
        assert_eq!(ids(&result), vec![1, 5]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn blank_search_matches_everything() {
        let result = run_query(&fixture(), &ListQuery::new(10).search("   "));
        assert_eq!(result.total, 5);
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn filters_are_anded() {
        let query = ListQuery::new(10).filter("group", "2").filter("rank", "3");
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![5]);
    }

    #[test]
    fn filter_accepts_camel_case_alias() {
        let query = ListQuery::new(10).filter("groupId", "1");
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 2]);
    }

    #[test]
    fn null_filter_matches_absent_reference() {
        let query = ListQuery::new(10).filter("group", "null");
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![3]);
    }

    #[test]
    fn bool_filter_accepts_numeric_spelling() {
        let query = ListQuery::new(10).filter("enabled", "1");
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![2, 4]);
    }

    #[test]
    fn unknown_filter_key_is_ignored() {
        let query = ListQuery::new(10).filter("colour", "red");
        assert_eq!(run_query(&fixture(), &query).total, 5);
    }

    #[test]
    fn filters_commute_with_search() {
        let a = ListQuery::new(10).search("a").filter("rank", "3");
        let b = ListQuery::new(10).filter("rank", "3").search("a");
        assert_eq!(ids(&run_query(&fixture(), &a)), ids(&run_query(&fixture(), &b)));
    }

    // -- sorting -------------------------------------------------------------

    #[test]
    fn sort_by_text_ignores_case() {
        let query = ListQuery::new(10).sort("name", SortOrder::Asc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 5, 2, 4, 3]);
    }

    #[test]
    fn sort_is_stable_ascending() {
        let query = ListQuery::new(10).sort("rank", SortOrder::Asc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![2, 4, 1, 3, 5]);
    }

    #[test]
    fn sort_is_stable_descending() {
        let query = ListQuery::new(10).sort("rank", SortOrder::Desc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn null_sorts_first_ascending() {
        let query = ListQuery::new(10).sort("group", SortOrder::Asc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![3, 1, 2, 4, 5]);
    }

    #[test]
    fn float_sort_descending() {
        let query = ListQuery::new(10).sort("price", SortOrder::Desc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn unknown_sort_field_keeps_input_order() {
        let query = ListQuery::new(10).sort("colour", SortOrder::Desc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sorting_happens_before_pagination() {
        let query = ListQuery::new(2).page(2).sort("id", SortOrder::Desc);
        assert_eq!(ids(&run_query(&fixture(), &query)), vec![3, 2]);
    }
}
