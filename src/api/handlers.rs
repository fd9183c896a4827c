use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::model::Id;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Success envelope: `{"status": 200, "data": ..., "message": "..."}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: u16,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Error envelope: `{"status": 404, "message": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<DataResponse<T>>), ApiError>;

pub fn respond<T>(status: StatusCode, data: T, message: Option<&'static str>) -> ApiResult<T> {
    Ok((
        status,
        Json(DataResponse {
            status: status.as_u16(),
            data,
            message,
        }),
    ))
}

/// Parse a path id; anything other than a non-negative integer is rejected.
pub fn parse_id(raw: &str) -> Result<Id, ApiError> {
    raw.parse::<Id>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| ApiError::InvalidId(raw.to_string()))
}
