//! JSON error bodies and the mapping from domain errors to HTTP statuses.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidArgument / ValidationFailed / malformed JSON body | 400 |
//! | missing `X-User-Id` | 401 |
//! | NotFound / CompositionUnavailable | 404 |
//! | AlreadyOwned / AlreadyDiscarded | 409 |
//! | DataUnavailable / Infrastructure | 503 |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::ErrorCode;
use crate::domain::purchase::PurchaseError;
use crate::domain::recommendation::RecommendationError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error: a status plus the body it renders.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code.to_string(), message),
        }
    }

    /// 400 for a malformed path or query value.
    pub fn invalid_argument(field: &str, message: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidArgument,
            format!("Invalid argument '{}': {}", field, message),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<RecommendationError> for ApiError {
    fn from(err: RecommendationError) -> Self {
        let status = match err {
            RecommendationError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            RecommendationError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.code(), err.message())
    }
}

impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        let status = match err {
            PurchaseError::NotFound(_) | PurchaseError::CompositionUnavailable(_) => {
                StatusCode::NOT_FOUND
            }
            PurchaseError::AlreadyOwned(_) | PurchaseError::AlreadyDiscarded(_) => {
                StatusCode::CONFLICT
            }
            PurchaseError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            PurchaseError::Infrastructure(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.code(), err.message())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match err {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Infrastructure(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.code(), err.message())
    }
}

/// A missing, mistyped or malformed JSON body is the caller's mistake.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_argument("body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, code = %self.body.code, message = %self.body.message, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}
