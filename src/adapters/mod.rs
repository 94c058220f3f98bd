//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum REST API
//! - `memory` - single-lock in-memory store (tests, database-free runs)
//! - `postgres` - sqlx-backed persistence

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::{app_router, MarketplaceAppState};
pub use memory::InMemoryMarketplace;
pub use postgres::{
    PostgresCompositionCatalog, PostgresPopularityStats, PostgresPreferenceStore,
    PostgresPurchaseLedger,
};
