//! Integration tests for the Products domain
//!
//! These run against a real MongoDB via testcontainers to check:
//! - The category `$lookup` and `$unwind` stages
//! - Ids round-trip as strings
//! - Update and gallery writes return the stored document
//!
//! Docker is required: `cargo test -p domain_products -- --ignored`

use chrono::Utc;
use domain_products::category::CATEGORIES_COLLECTION;
use domain_products::*;
use ::mongodb::Database;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};
use uuid::Uuid;

async fn seed_category(db: &Database, id: Uuid, name: &str) {
    db.collection::<Category>(CATEGORIES_COLLECTION)
        .insert_one(Category {
            id,
            name: name.to_string(),
            icon: None,
            color: Some("#aa0000".to_string()),
        })
        .await
        .unwrap();
}

fn new_product(builder: &TestDataBuilder, n: u64, category: Uuid, featured: bool) -> Product {
    let now = Utc::now();
    Product {
        id: builder.product_id(n),
        name: builder.name("product", &n.to_string()),
        description: "Integration test product".to_string(),
        image: format!("http://localhost/public/uploads/{n}.png"),
        images: Vec::new(),
        price: 12.5,
        category,
        count_in_stock: 3,
        is_featured: featured,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_with_category() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_create_get");
    let builder = TestDataBuilder::from_test_name("create_and_get");
    let repo = MongoProductRepository::new(&db);
    repo.init_indexes().await.unwrap();

    let category_id = builder.category_id();
    seed_category(&db, category_id, "Shirts").await;

    let created = repo
        .create(new_product(&builder, 1, category_id, true))
        .await
        .unwrap();

    let found = repo.get_by_id(created.id).await.unwrap();
    let found = assert_some(found, "product should exist");

    assert_uuid_eq(found.id, created.id, "product id");
    assert_eq!(found.name, created.name);
    let category = assert_some(found.category, "category should be joined");
    assert_uuid_eq(category.id, category_id, "category id");
    assert_eq!(category.name, "Shirts");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ids_are_stored_as_strings() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_string_ids");
    let builder = TestDataBuilder::from_test_name("string_ids");
    let repo = MongoProductRepository::new(&db);

    let product = new_product(&builder, 1, builder.category_id(), false);
    repo.create(product.clone()).await.unwrap();

    let raw = db
        .collection::<::mongodb::bson::Document>("products")
        .find_one(::mongodb::bson::doc! { "_id": product.id.to_string() })
        .await
        .unwrap();
    let raw = assert_some(raw, "document keyed by string id");

    assert_eq!(
        raw.get_str("category").unwrap(),
        product.category.to_string()
    );
    assert!(raw.contains_key("countInStock"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dangling_category_yields_none() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_dangling");
    let builder = TestDataBuilder::from_test_name("dangling");
    let repo = MongoProductRepository::new(&db);

    let created = repo
        .create(new_product(&builder, 1, Uuid::now_v7(), false))
        .await
        .unwrap();

    let found = repo.get_by_id(created.id).await.unwrap();
    let found = assert_some(found, "product without category is still listed");
    assert!(found.category.is_none());

    let listed = repo.list(ProductFilter::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_filters_by_category() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_filter");
    let builder = TestDataBuilder::from_test_name("filter");
    let repo = MongoProductRepository::new(&db);

    let shirts = builder.category_id();
    let shoes = Uuid::now_v7();
    seed_category(&db, shirts, "Shirts").await;
    seed_category(&db, shoes, "Shoes").await;

    repo.create(new_product(&builder, 1, shirts, false))
        .await
        .unwrap();
    repo.create(new_product(&builder, 2, shoes, false))
        .await
        .unwrap();
    repo.create(new_product(&builder, 3, shoes, false))
        .await
        .unwrap();

    let all = repo.list(ProductFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let only_shoes = repo
        .list(ProductFilter {
            categories: vec![shoes],
        })
        .await
        .unwrap();
    assert_eq!(only_shoes.len(), 2);
    assert!(
        only_shoes
            .iter()
            .all(|p| p.category.as_ref().map(|c| c.name.as_str()) == Some("Shoes"))
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_count_and_featured() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_featured");
    let builder = TestDataBuilder::from_test_name("featured");
    let repo = MongoProductRepository::new(&db);
    let category = builder.category_id();

    assert_eq!(repo.count().await.unwrap(), 0);

    for (n, featured) in [(1, true), (2, false), (3, true), (4, true)] {
        repo.create(new_product(&builder, n, category, featured))
            .await
            .unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 4);
    assert_eq!(repo.list_featured(0).await.unwrap().len(), 3);

    let limited = repo.list_featured(2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert!(limited.iter().all(|p| p.is_featured));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_returns_new_document() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_update");
    let builder = TestDataBuilder::from_test_name("update");
    let repo = MongoProductRepository::new(&db);

    let created = repo
        .create(new_product(&builder, 1, builder.category_id(), false))
        .await
        .unwrap();

    let form = ProductForm {
        name: "Renamed".to_string(),
        description: "Updated description".to_string(),
        price: 99.0,
        category: created.category,
        count_in_stock: 0,
        is_featured: true,
    };
    let changes = ProductChanges::new(form, created.image.clone());

    let updated = repo.update(created.id, changes).await.unwrap();
    let updated = assert_some(updated, "updated product");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.price, 99.0);
    assert_eq!(updated.count_in_stock, 0);
    assert!(updated.is_featured);
    assert_eq!(updated.image, created.image);
    assert_eq!(updated.created_at, created.created_at);

    let missing = repo
        .update(
            Uuid::now_v7(),
            ProductChanges::new(
                ProductForm {
                    name: "Ghost".to_string(),
                    description: "Nobody".to_string(),
                    price: 1.0,
                    category: created.category,
                    count_in_stock: 1,
                    is_featured: false,
                },
                String::new(),
            ),
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_set_gallery_and_delete() {
    let mongo = TestMongo::new().await;
    let db = mongo.database("catalog_gallery");
    let builder = TestDataBuilder::from_test_name("gallery");
    let repo = MongoProductRepository::new(&db);

    let created = repo
        .create(new_product(&builder, 1, builder.category_id(), false))
        .await
        .unwrap();

    let images = vec![
        "http://localhost/public/uploads/a.png".to_string(),
        "http://localhost/public/uploads/b.png".to_string(),
    ];
    let updated = repo.set_gallery(created.id, images.clone()).await.unwrap();
    let updated = assert_some(updated, "gallery updated");
    assert_eq!(updated.images, images);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
}
