//! `multipart/form-data` extractor with enveloped rejections.

use crate::errors::AppError;
use axum::extract::{FromRequest, Multipart, Request};

/// Wraps [`Multipart`] so a missing or malformed multipart body produces the
/// shared error envelope instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn upload(MultipartForm(mut form): MultipartForm) -> Result<(), AppError> {
///     while let Some(field) = form.next_field().await? {
///         let bytes = field.bytes().await?;
///     }
///     Ok(())
/// }
/// ```
pub struct MultipartForm(pub Multipart);

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Ok(Self(multipart))
    }
}
