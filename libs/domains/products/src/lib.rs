//! Products Domain
//!
//! Product catalog backed by MongoDB, with category references and image
//! uploads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │ ──→ │ ImageStore  │  ← files on disk, public URLs
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────────────────────┐
//! │ ProductRepository           │  ← products collection
//! │ CategoryRepository          │  ← categories collection (read-only)
//! └──────┬──────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← documents, form, filter
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers, ImageStore, MongoCategoryRepository, MongoProductRepository, ProductService,
//!     UploadConfig,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let service = ProductService::new(
//!     MongoProductRepository::new(&db),
//!     MongoCategoryRepository::new(&db),
//!     ImageStore::new(UploadConfig::default()),
//! );
//!
//! let router = axum::Router::new().nest("/api/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod upload;

pub use crate::category::{Category, CategoryRepository, MongoCategoryRepository};
pub use crate::error::{ProductError, ProductResult};
pub use crate::handlers::ApiDoc;
pub use crate::models::{
    DeleteResponse, Product, ProductChanges, ProductDetails, ProductFilter, ProductForm,
};
pub use crate::mongodb::MongoProductRepository;
pub use crate::repository::ProductRepository;
pub use crate::service::ProductService;
pub use crate::upload::{ImageStore, ImageType, ImageUpload, UploadConfig};
