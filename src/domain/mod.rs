//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `catalog` - Compositions, listings, and catalog filters
//! - `purchase` - Purchase aggregate and its lifecycle errors
//! - `recommendation` - Preference weights, popularity counters, scoring and ranking

pub mod catalog;
pub mod foundation;
pub mod purchase;
pub mod recommendation;
