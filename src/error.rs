use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::handlers::ErrorResponse;
use crate::logic::binder::BindError;
use crate::messages;

/// Reasons a request body is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("{0}")]
    Rule(&'static str),
}

/// Every failure a handler can answer with.
///
/// Store failures keep their `anyhow` chain for the log; the client only sees
/// the fixed message for the operation that failed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error("record not found")]
    NotFound,
    #[error("missing or malformed bearer token")]
    Unauthorized,
    #[error("query failed: {0:#}")]
    Query(anyhow::Error),
    #[error("create failed: {0:#}")]
    Create(anyhow::Error),
    #[error("update failed: {0:#}")]
    Update(anyhow::Error),
    #[error("delete failed: {0:#}")]
    Delete(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidId(_) | Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Create(_) | Self::Update(_) | Self::Delete(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::InvalidId(_) => messages::ID_INVALID.to_string(),
            Self::NotFound => messages::ID_NO_EXIST.to_string(),
            Self::Unauthorized => messages::TOKEN_INVALID.to_string(),
            Self::Query(_) => messages::ERROR_QUERY.to_string(),
            Self::Create(_) => messages::ERROR_CREATE.to_string(),
            Self::Update(_) => messages::ERROR_UPDATE.to_string(),
            Self::Delete(_) => messages::ERROR_DELETE.to_string(),
        }
    }
}

impl From<BindError> for ApiError {
    fn from(err: BindError) -> Self {
        Self::Validation(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Query(_) | Self::Create(_) | Self::Update(_) | Self::Delete(_) => {
                log::error!("{self}")
            }
            _ => log::debug!("rejecting request: {self}"),
        }

        (
            status,
            Json(ErrorResponse::new(status, self.client_message())),
        )
            .into_response()
    }
}
