//! Purchase handlers.
//!
//! ## Commands
//! - Purchasing a composition
//! - Discarding (refunding) a purchase
//!
//! ## Queries
//! - Listing a buyer's active purchases

mod discard_purchase;
mod list_purchases;
mod purchase_composition;

// Commands
pub use discard_purchase::{DiscardPurchaseCommand, DiscardPurchaseHandler};
pub use purchase_composition::{PurchaseCompositionCommand, PurchaseCompositionHandler};

// Queries
pub use list_purchases::{ListPurchasesHandler, ListPurchasesQuery, ListPurchasesResult};
