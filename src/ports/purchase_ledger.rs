//! Purchase ledger port (write side of the purchase workflow).
//!
//! # Atomicity
//!
//! `record_purchase` and `discard` each change two things: the purchase row
//! and the composition's purchase counter. Implementations must apply both
//! or neither, and must not lose updates when several buyers purchase the
//! same composition at once. The counter always equals the number of active
//! purchases of the composition.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::foundation::{CompositionId, DomainError, PurchaseId, UserId};
use crate::domain::purchase::Purchase;

/// Repository port for purchases.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Ids of compositions the buyer holds an active purchase of.
    async fn active_composition_ids(
        &self,
        buyer_id: &UserId,
    ) -> Result<HashSet<CompositionId>, DomainError>;

    /// Insert an active purchase and increment the composition's counter.
    ///
    /// # Errors
    ///
    /// - `CompositionUnavailable` if the composition is not eligible
    /// - `AlreadyOwned` if the buyer already holds an active purchase of it
    /// - `DatabaseError` on persistence failure
    ///
    /// Coded errors carry the `composition_id` detail.
    async fn record_purchase(&self, purchase: &Purchase) -> Result<(), DomainError>;

    /// Deactivate a purchase and decrement the composition's counter.
    /// Returns the purchase as it now stands.
    ///
    /// # Errors
    ///
    /// - `PurchaseNotFound` if no such purchase exists
    /// - `AlreadyDiscarded` if it is already inactive
    /// - `DatabaseError` on persistence failure
    ///
    /// Coded errors carry the `purchase_id` detail.
    async fn discard(&self, purchase_id: &PurchaseId) -> Result<Purchase, DomainError>;

    /// Find a purchase in any state.
    async fn find_by_id(&self, purchase_id: &PurchaseId) -> Result<Option<Purchase>, DomainError>;

    /// The buyer's active purchases, newest first.
    async fn list_active_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Purchase>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn PurchaseLedger) {}
    }
}
