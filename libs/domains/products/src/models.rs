use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::category::Category;
use crate::error::{ProductError, ProductResult};

/// Stores `Uuid`s as their hyphenated string form in BSON and JSON alike.
///
/// The `uuid` crate switches to raw bytes for non-human-readable
/// serializers, which would make stored ids and query filters disagree.
pub(crate) mod uuid_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&id.hyphenated())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(D::Error::custom)
    }
}

/// Product document as stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id", with = "uuid_string")]
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Absolute URL of the main image
    pub image: String,
    /// Absolute URLs of the gallery images, in upload order
    #[serde(default)]
    pub images: Vec<String>,
    pub price: f64,
    /// Id of the referenced category
    #[serde(with = "uuid_string")]
    #[schema(value_type = String, format = Uuid)]
    pub category: Uuid,
    pub count_in_stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(form: ProductForm, image: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: form.name,
            description: form.description,
            image,
            images: Vec::new(),
            price: form.price,
            category: form.category,
            count_in_stock: form.count_in_stock,
            is_featured: form.is_featured,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Product with its category expanded.
///
/// `category` is `None` when the referenced category no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(rename = "_id", alias = "id", with = "uuid_string")]
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<Category>,
    pub count_in_stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDetails {
    pub fn from_parts(product: Product, category: Option<Category>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            images: product.images,
            price: product.price,
            category,
            count_in_stock: product.count_in_stock,
            is_featured: product.is_featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Text fields of a create or update request.
///
/// Sent as `multipart/form-data` alongside the image; every field is
/// overwritten on update.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[schema(value_type = String, format = Uuid)]
    pub category: Uuid,
    #[validate(range(min = 0, max = 100000))]
    pub count_in_stock: i32,
    #[serde(default)]
    pub is_featured: bool,
}

impl ProductForm {
    /// Build a form from raw multipart text fields, then validate it.
    ///
    /// Missing and unparsable fields are reported together with the
    /// validator's rule failures as [`ProductError::InvalidForm`].
    pub fn from_fields(fields: &HashMap<String, String>) -> ProductResult<Self> {
        let mut errors = ValidationErrors::new();

        let name = required(fields, "name", &mut errors);
        let description = required(fields, "description", &mut errors);
        let price = parsed::<f64>(fields, "price", &mut errors).filter(|p| p.is_finite());
        let category = parsed::<Uuid>(fields, "category", &mut errors);
        let count_in_stock = parsed::<i32>(fields, "countInStock", &mut errors);
        let is_featured = match fields.get("isFeatured").map(|v| v.trim()) {
            None | Some("") => Some(false),
            Some(raw) => parse_or_flag(raw, "isFeatured", &mut errors),
        };

        if price.is_none() && !errors.errors().contains_key("price") {
            errors.add("price", invalid("price must be a finite number"));
        }

        let (
            Some(name),
            Some(description),
            Some(price),
            Some(category),
            Some(count_in_stock),
            Some(is_featured),
        ) = (name, description, price, category, count_in_stock, is_featured)
        else {
            return Err(ProductError::InvalidForm(errors));
        };

        let form = Self {
            name,
            description,
            price,
            category,
            count_in_stock,
            is_featured,
        };
        form.validate()?;
        Ok(form)
    }
}

fn required(
    fields: &HashMap<String, String>,
    key: &'static str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match fields.get(key) {
        Some(value) => Some(value.clone()),
        None => {
            errors.add(key, ValidationError::new("required"));
            None
        }
    }
}

fn parsed<T: FromStr>(
    fields: &HashMap<String, String>,
    key: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = required(fields, key, errors)?;
    parse_or_flag(raw.trim(), key, errors)
}

fn parse_or_flag<T: FromStr>(
    raw: &str,
    key: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(key, invalid("unparsable value"));
            None
        }
    }
}

fn invalid(message: &'static str) -> ValidationError {
    ValidationError::new("invalid").with_message(message.into())
}

/// Fields written by an update; everything else on the document is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    #[serde(with = "uuid_string")]
    pub category: Uuid,
    pub count_in_stock: i32,
    pub is_featured: bool,
    pub updated_at: DateTime<Utc>,
}

impl ProductChanges {
    pub fn new(form: ProductForm, image: String) -> Self {
        Self {
            name: form.name,
            description: form.description,
            image,
            price: form.price,
            category: form.category,
            count_in_stock: form.count_in_stock,
            is_featured: form.is_featured,
            updated_at: Utc::now(),
        }
    }
}

/// Raw query string of `GET /api/products`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Comma-separated category ids
    pub categories: Option<String>,
}

/// Restricts listings to products in any of `categories`; empty means all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub categories: Vec<Uuid>,
}

impl ProductFilter {
    /// Parse a comma-separated id list; blank entries are skipped.
    pub fn from_csv(raw: Option<&str>) -> ProductResult<Self> {
        let categories = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                Uuid::parse_str(entry)
                    .map_err(|_| ProductError::Validation(format!("Invalid category id: {entry}")))
            })
            .collect::<ProductResult<Vec<_>>>()?;

        Ok(Self { categories })
    }
}

impl TryFrom<ProductQuery> for ProductFilter {
    type Error = ProductError;

    fn try_from(query: ProductQuery) -> ProductResult<Self> {
        Self::from_csv(query.categories.as_deref())
    }
}

/// Number of featured products to return; `0` means no limit.
pub fn parse_featured_count(raw: Option<&str>) -> ProductResult<i64> {
    let Some(raw) = raw else {
        return Ok(0);
    };

    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|count| *count >= 0)
        .ok_or_else(|| ProductError::Validation(format!("Invalid featured count: {raw}")))
}

/// Multipart body of a gallery update, as documented in the API schema.
#[derive(Debug, ToSchema)]
pub struct GalleryForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<String>,
}

/// Body of a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
