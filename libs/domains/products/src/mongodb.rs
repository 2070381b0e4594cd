//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::category::CATEGORIES_COLLECTION;
use crate::error::ProductResult;
use crate::models::{Product, ProductChanges, ProductDetails, ProductFilter};
use crate::repository::ProductRepository;

pub const PRODUCTS_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Product>(PRODUCTS_COLLECTION),
        }
    }

    /// Create the indexes used by category filtering and featured listings.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "isFeatured": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_is_featured".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }

    fn build_filter(filter: &ProductFilter) -> Document {
        if filter.categories.is_empty() {
            return doc! {};
        }

        let ids: Vec<String> = filter.categories.iter().map(Uuid::to_string).collect();
        doc! { "category": { "$in": ids } }
    }

    /// `$match`, then embed the referenced category (or drop the field when
    /// the category is gone).
    fn details_pipeline(match_stage: Document) -> Vec<Document> {
        vec![
            doc! { "$match": match_stage },
            doc! {
                "$lookup": {
                    "from": CATEGORIES_COLLECTION,
                    "localField": "category",
                    "foreignField": "_id",
                    "as": "category",
                }
            },
            doc! {
                "$unwind": {
                    "path": "$category",
                    "preserveNullAndEmptyArrays": true,
                }
            },
        ]
    }

    async fn aggregate_details(&self, pipeline: Vec<Document>) -> ProductResult<Vec<ProductDetails>> {
        let documents: Vec<Document> = self
            .collection
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|doc| bson::from_document::<ProductDetails>(doc).map_err(Into::into))
            .collect()
    }

    async fn update_returning(&self, id: Uuid, set: Document) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_update(Self::id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(product)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<ProductDetails>> {
        let pipeline = Self::details_pipeline(Self::build_filter(&filter));
        self.aggregate_details(pipeline).await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<ProductDetails>> {
        let mut pipeline = Self::details_pipeline(Self::id_filter(id));
        pipeline.push(doc! { "$limit": 1 });

        Ok(self.aggregate_details(pipeline).await?.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> ProductResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_featured(&self, limit: i64) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .limit((limit > 0).then_some(limit))
            .build();

        let cursor = self
            .collection
            .find(doc! { "isFeatured": true })
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id, product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;

        tracing::info!("Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Option<Product>> {
        let set = bson::to_document(&changes)?;
        let product = self.update_returning(id, set).await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(product)
    }

    #[instrument(skip(self, images), fields(image_count = images.len()))]
    async fn set_gallery(&self, id: Uuid, images: Vec<String>) -> ProductResult<Option<Product>> {
        let set = doc! {
            "images": images,
            "updatedAt": bson::to_bson(&Utc::now())?,
        };
        self.update_returning(id, set).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_with_categories() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let filter = ProductFilter {
            categories: vec![a, b],
        };

        let doc = MongoProductRepository::build_filter(&filter);
        let ids = doc
            .get_document("category")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), Some(a.to_string().as_str()));
    }

    #[test]
    fn test_id_filter_uses_string_id() {
        let id = Uuid::now_v7();
        let doc = MongoProductRepository::id_filter(id);
        assert_eq!(doc.get_str("_id").unwrap(), id.to_string());
    }

    #[test]
    fn test_details_pipeline_stages() {
        let pipeline = MongoProductRepository::details_pipeline(doc! {});

        assert_eq!(pipeline.len(), 3);
        assert!(pipeline[0].contains_key("$match"));

        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), CATEGORIES_COLLECTION);
        assert_eq!(lookup.get_str("as").unwrap(), "category");

        let unwind = pipeline[2].get_document("$unwind").unwrap();
        assert!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap());
    }
}
