//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::category::CategoryRepository;
use crate::error::{ProductError, ProductResult};
use crate::models::{
    DeleteResponse, Product, ProductChanges, ProductDetails, ProductFilter, ProductForm,
};
use crate::repository::ProductRepository;
use crate::upload::{ImageStore, ImageUpload, ProductUpload};

pub const EMPTY_LIST: &str = "The product list is empty";
pub const PRODUCT_MISSING: &str = "The product with the given ID does not exist";
pub const NO_PRODUCTS: &str = "There are no products";
pub const CREATE_INVALID_CATEGORY: &str = "Invalid Category";
pub const NO_IMAGE: &str = "No image in the request";
pub const CREATE_FAILED: &str = "The product cannot be created";
pub const UPDATE_INVALID_CATEGORY: &str = "Invalid category";
pub const UPDATE_INVALID_PRODUCT: &str = "Invalid product";
pub const UPDATE_FAILED: &str = "the product cannot be updated!";
pub const GALLERY_FAILED: &str = "the gallery cannot be updated!";
pub const DELETED: &str = "the product is deleted!";
pub const DELETE_MISSING: &str = "product not found!";

/// Product operations over a product store, a category lookup and an
/// image store.
///
/// Each operation runs its checks in a fixed order and stops at the first
/// failure.
pub struct ProductService<R: ProductRepository, C: CategoryRepository> {
    repository: Arc<R>,
    categories: Arc<C>,
    images: ImageStore,
}

impl<R: ProductRepository, C: CategoryRepository> Clone for ProductService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: Arc::clone(&self.categories),
            images: self.images.clone(),
        }
    }
}

impl<R: ProductRepository, C: CategoryRepository> ProductService<R, C> {
    pub fn new(repository: R, categories: C, images: ImageStore) -> Self {
        Self {
            repository: Arc::new(repository),
            categories: Arc::new(categories),
            images,
        }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Products in any of the filter's categories, or all products.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<ProductDetails>> {
        let products = self.repository.list(filter).await?;
        if products.is_empty() {
            return Err(ProductError::NotFound(EMPTY_LIST.to_string()));
        }
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<ProductDetails> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(PRODUCT_MISSING.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn count_products(&self) -> ProductResult<u64> {
        match self.repository.count().await? {
            0 => Err(ProductError::NotFound(NO_PRODUCTS.to_string())),
            count => Ok(count),
        }
    }

    /// Featured products, at most `limit` of them; 0 means no limit.
    #[instrument(skip(self))]
    pub async fn featured_products(&self, limit: i64) -> ProductResult<Vec<Product>> {
        self.repository.list_featured(limit).await
    }

    /// Create a product from a multipart upload.
    ///
    /// Order: form, category, image presence, image type/size, file write,
    /// insert.
    #[instrument(skip(self, upload))]
    pub async fn create_product(
        &self,
        upload: ProductUpload,
        base_url: &str,
    ) -> ProductResult<Product> {
        let form = ProductForm::from_fields(&upload.fields)?;
        self.ensure_category(form.category, CREATE_INVALID_CATEGORY)
            .await?;

        let image = upload
            .image
            .ok_or_else(|| ProductError::Upload(NO_IMAGE.to_string()))?;
        let image_url = self.store_image(&image, base_url).await?;

        let product = Product::new(form, image_url);
        let product_id = product.id;
        let created = self.repository.create(product).await.map_err(|e| {
            tracing::error!(%product_id, error = %e, "Product insert failed");
            ProductError::PersistenceFailed(CREATE_FAILED.to_string())
        })?;

        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Overwrite a product's form fields, and its image when one is sent.
    ///
    /// Order: form, category, product existence, image, update.
    #[instrument(skip(self, upload))]
    pub async fn update_product(
        &self,
        id: Uuid,
        upload: ProductUpload,
        base_url: &str,
    ) -> ProductResult<Product> {
        let form = ProductForm::from_fields(&upload.fields)?;
        self.ensure_category(form.category, UPDATE_INVALID_CATEGORY)
            .await?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::Validation(UPDATE_INVALID_PRODUCT.to_string()))?;

        let image_url = match upload.image {
            Some(image) => self.store_image(&image, base_url).await?,
            None => existing.image,
        };

        self.repository
            .update(id, ProductChanges::new(form, image_url))
            .await?
            .ok_or_else(|| ProductError::PersistenceFailed(UPDATE_FAILED.to_string()))
    }

    /// Replace the gallery with `images`.
    ///
    /// Every file is checked before any is written. Files written for a
    /// product that turns out not to exist stay on disk.
    #[instrument(skip(self, images), fields(image_count = images.len()))]
    pub async fn update_gallery(
        &self,
        id: Uuid,
        images: Vec<ImageUpload>,
        base_url: &str,
    ) -> ProductResult<Product> {
        for image in &images {
            self.images.check(image)?;
        }

        let mut urls = Vec::with_capacity(images.len());
        for image in &images {
            urls.push(self.store_image(image, base_url).await?);
        }

        self.repository
            .set_gallery(id, urls)
            .await?
            .ok_or_else(|| ProductError::PersistenceFailed(GALLERY_FAILED.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<DeleteResponse> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(DELETE_MISSING.to_string()));
        }

        Ok(DeleteResponse {
            success: true,
            message: DELETED.to_string(),
        })
    }

    async fn ensure_category(&self, id: Uuid, message: &str) -> ProductResult<()> {
        match self.categories.get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ProductError::Validation(message.to_string())),
        }
    }

    async fn store_image(&self, image: &ImageUpload, base_url: &str) -> ProductResult<String> {
        let file_name = self.images.store(image).await?;
        Ok(self.images.public_url(base_url, &file_name))
    }
}
