//! Purchase module - buyer ownership of compositions.
//!
//! A purchase is created at checkout and flipped to inactive when refunded or
//! discarded. Records are never deleted so the ledger doubles as an audit trail.

mod aggregate;
mod errors;

pub use aggregate::Purchase;
pub use errors::PurchaseError;
