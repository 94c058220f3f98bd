//! Catalog-specific error types.

use crate::domain::foundation::{CompositionId, ErrorCode};

/// Errors raised by catalog queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Composition does not exist, is unpublished, or was deleted.
    NotFound(CompositionId),

    /// Underlying data fetch failed.
    Infrastructure(String),
}

impl CatalogError {
    pub fn not_found(id: CompositionId) -> Self {
        CatalogError::NotFound(id)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CatalogError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::NotFound(_) => ErrorCode::CompositionNotFound,
            CatalogError::Infrastructure(_) => ErrorCode::DataUnavailable,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            CatalogError::NotFound(id) => format!("Composition not found: {}", id),
            CatalogError::Infrastructure(msg) => format!("Catalog unavailable: {}", msg),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CatalogError {}
