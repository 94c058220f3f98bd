//! Purchase-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | CompositionUnavailable | 404 |
//! | AlreadyOwned | 409 |
//! | AlreadyDiscarded | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 503 |

use crate::domain::foundation::{CompositionId, DomainError, ErrorCode, PurchaseId};

/// Purchase workflow errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// Purchase record does not exist.
    NotFound(PurchaseId),

    /// Composition is missing, unpublished, or deleted.
    CompositionUnavailable(CompositionId),

    /// Buyer already holds an active purchase of the composition.
    AlreadyOwned(CompositionId),

    /// Purchase was already discarded.
    AlreadyDiscarded(PurchaseId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl PurchaseError {
    pub fn not_found(id: PurchaseId) -> Self {
        PurchaseError::NotFound(id)
    }

    pub fn composition_unavailable(id: CompositionId) -> Self {
        PurchaseError::CompositionUnavailable(id)
    }

    pub fn already_owned(id: CompositionId) -> Self {
        PurchaseError::AlreadyOwned(id)
    }

    pub fn already_discarded(id: PurchaseId) -> Self {
        PurchaseError::AlreadyDiscarded(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PurchaseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PurchaseError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PurchaseError::NotFound(_) => ErrorCode::PurchaseNotFound,
            PurchaseError::CompositionUnavailable(_) => ErrorCode::CompositionUnavailable,
            PurchaseError::AlreadyOwned(_) => ErrorCode::AlreadyOwned,
            PurchaseError::AlreadyDiscarded(_) => ErrorCode::AlreadyDiscarded,
            PurchaseError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PurchaseError::Infrastructure(_) => ErrorCode::DataUnavailable,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PurchaseError::NotFound(id) => format!("Purchase not found: {}", id),
            PurchaseError::CompositionUnavailable(id) => {
                format!("Composition {} is not available for purchase", id)
            }
            PurchaseError::AlreadyOwned(id) => {
                format!("Composition {} is already owned", id)
            }
            PurchaseError::AlreadyDiscarded(id) => {
                format!("Purchase {} was already discarded", id)
            }
            PurchaseError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PurchaseError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PurchaseError {}

/// Ledger adapters report workflow rejections as coded `DomainError`s; the
/// offending ids travel in the `purchase_id` / `composition_id` details.
impl From<DomainError> for PurchaseError {
    fn from(err: DomainError) -> Self {
        let purchase_id = err
            .details
            .get("purchase_id")
            .and_then(|s| s.parse::<PurchaseId>().ok());
        let composition_id = err
            .details
            .get("composition_id")
            .and_then(|s| s.parse::<CompositionId>().ok());

        match (err.code, purchase_id, composition_id) {
            (ErrorCode::PurchaseNotFound, Some(id), _) => PurchaseError::NotFound(id),
            (ErrorCode::AlreadyDiscarded, Some(id), _) => PurchaseError::AlreadyDiscarded(id),
            (ErrorCode::AlreadyOwned, _, Some(id)) => PurchaseError::AlreadyOwned(id),
            (ErrorCode::CompositionUnavailable, _, Some(id))
            | (ErrorCode::CompositionNotFound, _, Some(id)) => {
                PurchaseError::CompositionUnavailable(id)
            }
            (ErrorCode::ValidationFailed, _, _) => PurchaseError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => PurchaseError::Infrastructure(err.to_string()),
        }
    }
}

impl From<PurchaseError> for DomainError {
    fn from(err: PurchaseError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
