//! Product model and DTOs.

use serde::{Deserialize, Serialize};
use storefront_core::query::{FieldValue, Queryable};
use storefront_core::types::{DbId, Timestamp};
use validator::Validate;

/// Publication status of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    #[default]
    Draft,
    Archived,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Archived => "archived",
        }
    }
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    /// `None` for uncategorized products.
    pub category_id: Option<DbId>,
    pub status: ProductStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub category_id: Option<DbId>,
    pub status: Option<ProductStatus>,
}

/// DTO for updating a product.
///
/// `category_id` distinguishes "absent" (keep) from `null` (uncategorize).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub category_id: Option<Option<DbId>>,
    pub status: Option<ProductStatus>,
}

impl Queryable for Product {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(&self.name),
            "slug" => FieldValue::Text(&self.slug),
            "description" => self
                .description
                .as_deref()
                .map_or(FieldValue::Null, FieldValue::Text),
            "price" => FieldValue::Float(self.price),
            "category_id" | "categoryId" => {
                self.category_id.map_or(FieldValue::Null, FieldValue::Int)
            }
            "status" => FieldValue::Text(self.status.as_str()),
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
