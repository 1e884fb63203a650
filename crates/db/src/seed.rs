//! Demo catalog used for local development and the storefront preview.
//!
//! Loaded through the repositories so the fixture obeys the same invariants
//! as user-created data.

use storefront_core::error::CoreError;

use crate::models::category::CreateCategory;
use crate::models::product::{CreateProduct, ProductStatus};
use crate::repositories::{CategoryRepo, ProductRepo};
use crate::store::CatalogStore;

fn category(name: &str, description: &str, parent_id: Option<i64>) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: Some(description.to_string()),
        parent_id,
        ..Default::default()
    }
}

fn product(
    name: &str,
    description: &str,
    price: f64,
    category_id: i64,
    status: ProductStatus,
) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
        category_id: Some(category_id),
        status: Some(status),
        ..Default::default()
    }
}

/// Insert the demo categories and the four demo products.
pub async fn seed_demo_catalog(store: &CatalogStore) -> Result<(), CoreError> {
    let electronics = CategoryRepo::create(
        store,
        &category("Electronics", "Gadgets, devices and accessories", None),
    )
    .await?;
    let audio = CategoryRepo::create(
        store,
        &category("Audio", "Headphones, speakers and sound", Some(electronics.id)),
    )
    .await?;
    let computers = CategoryRepo::create(
        store,
        &category("Computers", "Laptops, desktops and peripherals", Some(electronics.id)),
    )
    .await?;
    let clothing =
        CategoryRepo::create(store, &category("Clothing", "Apparel for every season", None))
            .await?;
    let shoes = CategoryRepo::create(
        store,
        &category("Shoes", "Sneakers, boots and sandals", Some(clothing.id)),
    )
    .await?;
    CategoryRepo::create(
        store,
        &CreateCategory {
            is_active: Some(false),
            ..category("Home & Garden", "Furniture, decor and outdoor living", None)
        },
    )
    .await?;

    let demo_products = [
        product(
            "Premium Wireless Headphones",
            "Over-ear headphones with active noise cancellation",
            199.99,
            audio.id,
            ProductStatus::Active,
        ),
        product(
            "Mechanical Keyboard",
            "Hot-swappable switches with per-key RGB lighting",
            129.5,
            computers.id,
            ProductStatus::Active,
        ),
        product(
            "Trail Running Shoes",
            "Lightweight shoes with a grippy outsole",
            89.0,
            shoes.id,
            ProductStatus::Active,
        ),
        product(
            "Organic Cotton T-Shirt",
            "Soft crew-neck tee in five colours",
            19.99,
            clothing.id,
            ProductStatus::Draft,
        ),
    ];
    for input in &demo_products {
        ProductRepo::create(store, input).await?;
    }

    tracing::info!(
        categories = 6,
        products = demo_products.len(),
        "Demo catalog seeded"
    );
    Ok(())
}
