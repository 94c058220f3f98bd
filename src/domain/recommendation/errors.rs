//! Recommendation error types.
//!
//! Only two things can go wrong: the caller passes a bad argument, or a
//! collaborator fails to deliver data. An unknown buyer, a buyer without
//! preferences, and an empty catalog are all valid empty outcomes.

use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    /// Rejected before any data access.
    InvalidArgument { field: String, message: String },

    /// A catalog, preference, purchase or stats fetch failed.
    DataUnavailable(String),
}

impl RecommendationError {
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        RecommendationError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        RecommendationError::DataUnavailable(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RecommendationError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            RecommendationError::DataUnavailable(_) => ErrorCode::DataUnavailable,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RecommendationError::InvalidArgument { field, message } => {
                format!("Invalid argument '{}': {}", field, message)
            }
            RecommendationError::DataUnavailable(msg) => {
                format!("Recommendation data unavailable: {}", msg)
            }
        }
    }

    /// Hint for callers deciding whether to retry. The engine never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RecommendationError::DataUnavailable(_))
    }
}

impl std::fmt::Display for RecommendationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RecommendationError {}

/// Caller mistakes reported by a store stay `InvalidArgument`; everything
/// else is a data failure.
impl From<DomainError> for RecommendationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => RecommendationError::InvalidArgument {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "request".to_string()),
                message: err.message,
            },
            ErrorCode::CategoryNotFound => RecommendationError::InvalidArgument {
                field: "category_id".to_string(),
                message: err.message,
            },
            _ => RecommendationError::DataUnavailable(err.to_string()),
        }
    }
}
