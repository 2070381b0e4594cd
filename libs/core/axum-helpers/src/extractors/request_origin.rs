//! Scheme and host of the incoming request.

use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Where the client reached this service, as `{scheme}://{host}`.
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy terminates TLS,
/// then from the request URI, and defaults to `http`. The host comes from the
/// `Host` header, falling back to the URI authority. A request with neither is
/// rejected with 400.
///
/// ```ignore
/// async fn upload(origin: RequestOrigin) -> String {
///     format!("{}/public/uploads/", origin.base_url())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    fn from_parts(parts: &Parts) -> Option<Self> {
        let scheme = first_value(&parts.headers, FORWARDED_PROTO)
            .or_else(|| parts.uri.scheme_str().map(str::to_owned))
            .unwrap_or_else(|| "http".to_string());

        let host = first_value(&parts.headers, header::HOST.as_str())
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))?;

        Some(Self { scheme, host })
    }
}

/// First comma-separated entry of a header, trimmed and non-empty
fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
            .ok_or_else(|| AppError::BadRequest("Missing Host header".to_string()))
    }
}
