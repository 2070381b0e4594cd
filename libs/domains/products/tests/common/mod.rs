//! Shared fixtures for the products integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use domain_products::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Vec-backed product store that mirrors the MongoDB repository's semantics.
#[derive(Clone, Default)]
pub struct InMemoryProducts {
    products: Arc<Mutex<Vec<Product>>>,
}

impl InMemoryProducts {
    pub fn insert(&self, product: Product) {
        self.products.lock().unwrap().push(product);
    }

    pub fn get(&self, id: Uuid) -> Option<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.products.lock().unwrap().len()
    }
}

/// Category lookup over a fixed map.
#[derive(Clone, Default)]
pub struct InMemoryCategories {
    categories: Arc<Mutex<HashMap<Uuid, Category>>>,
}

impl InMemoryCategories {
    pub fn with(categories: impl IntoIterator<Item = Category>) -> Self {
        let store = Self::default();
        for category in categories {
            store.insert(category);
        }
        store
    }

    pub fn insert(&self, category: Category) {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category);
    }

    fn lookup(&self, id: Uuid) -> Option<Category> {
        self.categories.lock().unwrap().get(&id).cloned()
    }
}

/// Products and categories share one view so listings can expand categories.
#[derive(Clone, Default)]
pub struct Catalog {
    pub products: InMemoryProducts,
    pub categories: InMemoryCategories,
}

#[async_trait]
impl ProductRepository for Catalog {
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<ProductDetails>> {
        let products = self.products.products.lock().unwrap().clone();
        Ok(products
            .into_iter()
            .filter(|p| filter.categories.is_empty() || filter.categories.contains(&p.category))
            .map(|p| {
                let category = self.categories.lookup(p.category);
                ProductDetails::from_parts(p, category)
            })
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductDetails>> {
        Ok(self.products.get(id).map(|p| {
            let category = self.categories.lookup(p.category);
            ProductDetails::from_parts(p, category)
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.get(id))
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(self.products.len() as u64)
    }

    async fn list_featured(&self, limit: i64) -> ProductResult<Vec<Product>> {
        let products = self.products.products.lock().unwrap();
        let featured = products
            .iter()
            .filter(|p| p.is_featured)
            .cloned();

        Ok(match limit {
            0 => featured.collect(),
            n => featured.take(n as usize).collect(),
        })
    }

    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.products.insert(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Option<Product>> {
        let mut products = self.products.products.lock().unwrap();
        Ok(products.iter_mut().find(|p| p.id == id).map(|p| {
            p.name = changes.name;
            p.description = changes.description;
            p.image = changes.image;
            p.price = changes.price;
            p.category = changes.category;
            p.count_in_stock = changes.count_in_stock;
            p.is_featured = changes.is_featured;
            p.updated_at = changes.updated_at;
            p.clone()
        }))
    }

    async fn set_gallery(&self, id: Uuid, images: Vec<String>) -> ProductResult<Option<Product>> {
        let mut products = self.products.products.lock().unwrap();
        Ok(products.iter_mut().find(|p| p.id == id).map(|p| {
            p.images = images;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait]
impl CategoryRepository for Catalog {
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Category>> {
        Ok(self.categories.lookup(id))
    }
}

pub fn category(id: Uuid, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        icon: Some("icon-tag".to_string()),
        color: Some("#336699".to_string()),
    }
}

pub fn product(id: Uuid, category: Uuid, featured: bool) -> Product {
    let now = Utc::now();
    Product {
        id,
        name: format!("Product {id}"),
        description: "Seeded product".to_string(),
        image: "http://shop.test/public/uploads/seed.png".to_string(),
        images: Vec::new(),
        price: 10.0,
        category,
        count_in_stock: 4,
        is_featured: featured,
        created_at: now,
        updated_at: now,
    }
}

/// Hand-assembled `multipart/form-data` body.
pub struct MultipartBody {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "catalog-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn product_fields(self, category: Uuid) -> Self {
        self.text("name", "Linen shirt")
            .text("description", "Breathable summer shirt")
            .text("price", "39.90")
            .text("category", &category.to_string())
            .text("countInStock", "12")
            .text("isFeatured", "true")
    }

    /// Content-Type header value and the closed body
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
