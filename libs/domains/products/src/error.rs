use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid product form: {0}")]
    InvalidForm(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    Upload(String),

    /// The store accepted the call but produced no document
    #[error("{0}")]
    PersistenceFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(msg) => AppError::NotFound(msg),
            ProductError::Validation(msg)
            | ProductError::InvalidId(msg)
            | ProductError::Upload(msg) => AppError::BadRequest(msg),
            ProductError::InvalidForm(errors) => AppError::ValidationError(errors),
            ProductError::PersistenceFailed(msg) | ProductError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
            ProductError::Database(detail) => AppError::Database(detail),
            ProductError::Storage(e) => AppError::Io(e),
            ProductError::Multipart(e) => AppError::Multipart(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for ProductError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}
