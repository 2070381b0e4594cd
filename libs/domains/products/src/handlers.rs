//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, State},
    routing::{get, put},
};
use axum_helpers::{
    MultipartForm, RequestOrigin, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::category::{Category, CategoryRepository};
use crate::error::{ProductError, ProductResult};
use crate::models::{
    DeleteResponse, GalleryForm, Product, ProductDetails, ProductFilter, ProductForm, ProductQuery,
    parse_featured_count,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::upload::{read_gallery_upload, read_product_upload};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        count_products,
        featured_products,
        featured_products_limited,
        update_gallery,
    ),
    components(
        schemas(Product, ProductDetails, ProductForm, GalleryForm, Category, DeleteResponse),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Products router; mount it under `/api/products`.
pub fn router<R, C>(service: ProductService<R, C>) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let body_limit = service.images().config().body_limit();
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/get/count", get(count_products))
        .route("/get/featured", get(featured_products))
        .route("/get/featured/{count}", get(featured_products_limited))
        .route("/gallery-images/{id}", put(update_gallery))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(shared_service)
}

fn parse_id(raw: &str, message: &str) -> ProductResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ProductError::InvalidId(message.to_string()))
}

/// List products, optionally restricted to some categories
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Products with their categories", body = Vec<ProductDetails>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    Query(query): Query<ProductQuery>,
) -> ProductResult<Json<Vec<ProductDetails>>> {
    let filter = ProductFilter::try_from(query)?;
    let products = service.list_products(filter).await?;
    Ok(Json(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductDetails>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Total number of products
#[utoipa::path(
    get,
    path = "/get/count",
    tag = "Products",
    responses(
        (status = 200, description = "Product count", body = u64),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_products<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
) -> ProductResult<Json<u64>> {
    let count = service.count_products().await?;
    Ok(Json(count))
}

/// All featured products
#[utoipa::path(
    get,
    path = "/get/featured",
    tag = "Products",
    responses(
        (status = 200, description = "Featured products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn featured_products<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.featured_products(parse_featured_count(None)?).await?;
    Ok(Json(products))
}

/// At most `count` featured products; 0 returns all
#[utoipa::path(
    get,
    path = "/get/featured/{count}",
    tag = "Products",
    params(
        ("count" = u32, Path, description = "Maximum number of products")
    ),
    responses(
        (status = 200, description = "Featured products", body = Vec<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn featured_products_limited<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    Path(count): Path<String>,
) -> ProductResult<Json<Vec<Product>>> {
    let limit = parse_featured_count(Some(&count))?;
    let products = service.featured_products(limit).await?;
    Ok(Json(products))
}

/// Create a product from form fields and an `image` file
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = ProductForm, content_type = "multipart/form-data",
        description = "Product fields plus an `image` file (png, jpeg or jpg)"),
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    origin: RequestOrigin,
    MultipartForm(mut form): MultipartForm,
) -> ProductResult<Json<Product>> {
    let upload = read_product_upload(&mut form).await?;
    let product = service.create_product(upload, &origin.base_url()).await?;
    Ok(Json(product))
}

/// Overwrite a product; the image is replaced only when one is sent
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = ProductForm, content_type = "multipart/form-data",
        description = "Product fields plus an optional `image` file"),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    Path(raw_id): Path<String>,
    origin: RequestOrigin,
    MultipartForm(mut form): MultipartForm,
) -> ProductResult<Json<Product>> {
    let id = parse_id(&raw_id, "Invalid product id")?;
    let upload = read_product_upload(&mut form).await?;
    let product = service
        .update_product(id, upload, &origin.base_url())
        .await?;
    Ok(Json(product))
}

/// Replace a product's gallery with the uploaded `images` files
#[utoipa::path(
    put,
    path = "/gallery-images/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = GalleryForm, content_type = "multipart/form-data",
        description = "Up to the configured number of `images` files"),
    responses(
        (status = 200, description = "Gallery replaced", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_gallery<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    Path(raw_id): Path<String>,
    origin: RequestOrigin,
    MultipartForm(mut form): MultipartForm,
) -> ProductResult<Json<Product>> {
    let id = parse_id(&raw_id, "Invalid Product Id")?;
    let max_images = service.images().config().max_gallery_images;
    let images = read_gallery_upload(&mut form, max_images).await?;
    let product = service
        .update_gallery(id, images, &origin.base_url())
        .await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = DeleteResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<R, C>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<DeleteResponse>> {
    let response = service.delete_product(id).await?;
    Ok(Json(response))
}
