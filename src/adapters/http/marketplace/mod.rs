//! HTTP adapter for marketplace endpoints.
//!
//! Exposes recommendations, preferences, the catalog, purchases and composer
//! stats under `/api`. See [`routes::marketplace_routes`] for the full table.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MarketplaceAppState;
pub use routes::marketplace_routes;
