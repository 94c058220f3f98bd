//! In-memory marketplace adapter.
//!
//! Implements every marketplace port over a single lock-protected state, so
//! purchase rows and popularity counters always change together. Used by the
//! test suites and for running the service without a database.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::memory::InMemoryMarketplace;
//!
//! let store = Arc::new(InMemoryMarketplace::new());
//! store.add_composition(composition).await;
//! ```

mod marketplace_store;

pub use marketplace_store::InMemoryMarketplace;
