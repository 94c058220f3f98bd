//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Read Ports (consumed by the recommender)
//!
//! - `CompositionCatalog` - Eligible compositions and catalog listings
//! - `PreferenceStore` - Buyer category weights (also upserts)
//! - `PopularityStats` - Per-composition view/purchase counters
//!
//! ## Workflow Ports
//!
//! - `PurchaseLedger` - Purchase records plus the atomic counter updates

mod composition_catalog;
mod popularity_stats;
mod preference_store;
mod purchase_ledger;

pub use composition_catalog::CompositionCatalog;
pub use popularity_stats::PopularityStats;
pub use preference_store::PreferenceStore;
pub use purchase_ledger::PurchaseLedger;
