use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductChanges, ProductDetails, ProductFilter};

/// Persistence for products.
///
/// Methods returning `Option` report a missing document as `None`; only
/// store failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `filter`, each with its category expanded
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<ProductDetails>>;

    /// One product with its category expanded
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductDetails>>;

    /// One product as stored, category left as an id
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn count(&self) -> ProductResult<u64>;

    /// Featured products; a `limit` of 0 returns all of them
    async fn list_featured(&self, limit: i64) -> ProductResult<Vec<Product>>;

    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Overwrite the form fields and image, returning the updated document
    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Option<Product>>;

    /// Replace the gallery wholesale, returning the updated document
    async fn set_gallery(&self, id: Uuid, images: Vec<String>) -> ProductResult<Option<Product>>;

    /// Returns whether a document was removed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}
