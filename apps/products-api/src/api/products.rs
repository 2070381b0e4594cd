//! Products API routes

use axum::Router;
use domain_products::{
    ImageStore, MongoCategoryRepository, MongoProductRepository, ProductService, handlers,
};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let service = ProductService::new(
        MongoProductRepository::new(&state.db),
        MongoCategoryRepository::new(&state.db),
        ImageStore::new(state.config.uploads.clone()),
    );
    handlers::router(service)
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
