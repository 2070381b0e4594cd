//! Top-level OpenAPI document served by the docs UIs

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog API",
        description = "Products with category references, image uploads and gallery images"
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc)
    )
)]
pub struct ApiDoc;
