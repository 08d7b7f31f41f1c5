//! Error responses

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use homestash_core::StoreError;

/// A failed request, rendered as `{"error": ..., "code"?: ..., "details"?: ...}`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Store failure reported with `status`, keeping the SQLite code if any.
    pub fn from_store(status: StatusCode, err: StoreError) -> Self {
        Self {
            status,
            code: err.code().map(str::to_string),
            message: err.to_string(),
            details: None,
        }
    }

    pub fn bad_request(err: StoreError) -> Self {
        Self::from_store(StatusCode::BAD_REQUEST, err)
    }

    pub fn internal(err: StoreError) -> Self {
        Self::from_store(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// 400 for validation failures, 500 for anything the store raised.
    pub fn rejected_or_internal(err: StoreError) -> Self {
        match err {
            StoreError::Validation(_) => Self::bad_request(err),
            _ => Self::internal(err),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }
}

/// Unreadable JSON bodies fall through to the generic 500.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".to_string(),
            code: None,
            details: Some(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, code = ?self.code, "{}", self.message);
        } else {
            tracing::debug!(status = %self.status, "{}", self.message);
        }

        let body = ErrorBody {
            error: &self.message,
            code: self.code.as_deref(),
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}
