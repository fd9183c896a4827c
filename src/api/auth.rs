use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Axum extractor that admits requests carrying an `Authorization: Bearer <token>` header.
///
/// Only the presence and shape of the header are checked; the token itself is
/// not verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerToken;

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if has_bearer(&parts.headers) {
            Ok(BearerToken)
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.len() > BEARER_PREFIX.len() && value.starts_with(BEARER_PREFIX))
}
