//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the marketplace domain.

mod errors;
mod ids;
mod price;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CategoryId, CompositionId, PurchaseId, UserId};
pub use price::Price;
pub use timestamp::Timestamp;
