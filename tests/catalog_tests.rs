//! Catalog store and validation tests

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;
use validator::Validate;

use storefront_server::models::{CreateProductRequest, Product, ProductListParams};
use storefront_server::store::{CatalogStore, MemoryCatalogStore};

fn sample_product(name: &str, category: &str, is_active: bool) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} description"),
        price: 19.99,
        category: category.to_string(),
        stock: 5,
        image_url: None,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_insert_then_find_by_id() {
    let store = MemoryCatalogStore::new();
    let product = sample_product("Keyboard", "electronics", true);

    let inserted = store.insert(product.clone()).await.unwrap();
    assert_eq!(inserted.id, product.id);

    let found = store.find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Keyboard");
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let store = MemoryCatalogStore::new();
    let mut product = sample_product("Keyboard", "electronics", true);
    store.insert(product.clone()).await.unwrap();

    product.price = 24.99;
    product.stock = 3;
    let updated = store.update(product.clone()).await.unwrap();
    assert_eq!(updated.price, 24.99);

    let found = store.find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(found.price, 24.99);
    assert_eq!(found.stock, 3);
}

#[tokio::test]
async fn test_delete_reports_whether_row_existed() {
    let store = MemoryCatalogStore::new();
    let product = sample_product("Keyboard", "electronics", true);
    store.insert(product.clone()).await.unwrap();

    assert!(store.delete(product.id).await.unwrap());
    assert!(!store.delete(product.id).await.unwrap());
    assert!(store.find_by_id(product.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_hides_inactive_by_default() {
    let store = MemoryCatalogStore::new();
    store
        .insert(sample_product("Keyboard", "electronics", true))
        .await
        .unwrap();
    store
        .insert(sample_product("Discontinued mouse", "electronics", false))
        .await
        .unwrap();

    let visible = store.list(&ProductListParams::default()).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Keyboard");

    let all = store
        .list(&ProductListParams {
            category: None,
            include_inactive: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_list_filters_by_category() {
    let store = MemoryCatalogStore::new();
    store
        .insert(sample_product("Keyboard", "electronics", true))
        .await
        .unwrap();
    store
        .insert(sample_product("Mug", "kitchen", true))
        .await
        .unwrap();

    let kitchen = store
        .list(&ProductListParams {
            category: Some("kitchen".to_string()),
            include_inactive: None,
        })
        .await
        .unwrap();
    assert_eq!(kitchen.len(), 1);
    assert_eq!(kitchen[0].name, "Mug");
}

fn create_request(name: &str, price: f64, stock: Option<i32>) -> CreateProductRequest {
    CreateProductRequest {
        name: name.to_string(),
        description: "A product".to_string(),
        price,
        category: "general".to_string(),
        stock,
        image_url: None,
    }
}

#[test]
fn test_create_request_rejects_negative_price() {
    assert!(create_request("Keyboard", -0.01, None).validate().is_err());
}

#[test]
fn test_create_request_rejects_negative_stock() {
    assert!(create_request("Keyboard", 1.0, Some(-1)).validate().is_err());
}

#[test]
fn test_create_request_rejects_empty_name() {
    assert!(create_request("", 1.0, None).validate().is_err());
}

proptest! {
    #[test]
    fn prop_non_negative_price_and_stock_accepted(
        price in 0.0f64..100_000.0,
        stock in 0i32..10_000,
    ) {
        let request = create_request("Keyboard", price, Some(stock));
        prop_assert!(request.validate().is_ok());
    }

    #[test]
    fn prop_negative_price_rejected(price in -100_000.0f64..-0.01) {
        let request = create_request("Keyboard", price, None);
        prop_assert!(request.validate().is_err());
    }

    #[test]
    fn prop_negative_stock_rejected(stock in i32::MIN..0) {
        let request = create_request("Keyboard", 1.0, Some(stock));
        prop_assert!(request.validate().is_err());
    }
}
