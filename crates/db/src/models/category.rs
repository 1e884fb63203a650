//! Category model and DTOs.

use serde::{Deserialize, Serialize};
use storefront_core::query::{FieldValue, Page, Queryable};
use storefront_core::tree::TreeItem;
use storefront_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::product::Product;

/// A stored category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    /// Depth in the hierarchy, 0 for roots.
    pub level: i32,
    pub is_active: bool,
    /// Ordering among siblings.
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    /// Derived from `name` when absent.
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub is_active: Option<bool>,
    /// Defaults to one past the last sibling.
    #[validate(range(min = 0, message = "must not be negative"))]
    pub position: Option<i32>,
}

/// DTO for updating a category.
///
/// `parent_id` distinguishes "absent" (keep) from `null` (make root).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub parent_id: Option<Option<DbId>>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub position: Option<i32>,
}

/// How to treat dependents when deleting a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Refuse to delete a category that has children or products.
    #[default]
    Restrict,
    /// Promote children to roots and uncategorize products.
    Reassign,
    /// Delete the whole subtree and uncategorize its products.
    Cascade,
}

/// One entry of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: DbId,
    pub position: i32,
}

/// A category together with one page of its products.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithProducts {
    pub category: Category,
    pub products: Page<Product>,
}

impl Queryable for Category {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(&self.name),
            "slug" => FieldValue::Text(&self.slug),
            "description" => self
                .description
                .as_deref()
                .map_or(FieldValue::Null, FieldValue::Text),
            "parent_id" | "parentId" => self.parent_id.map_or(FieldValue::Null, FieldValue::Int),
            "level" => FieldValue::Int(i64::from(self.level)),
            "is_active" | "isActive" => FieldValue::Bool(self.is_active),
            "position" => FieldValue::Int(i64::from(self.position)),
            "created_at" | "createdAt" => FieldValue::Int(self.created_at.timestamp_micros()),
            "updated_at" | "updatedAt" => FieldValue::Int(self.updated_at.timestamp_micros()),
            _ => return None,
        })
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.slug.as_str()];
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        fields
    }
}

impl TreeItem for Category {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn position(&self) -> i32 {
        self.position
    }
}
