//! Preference store port.

use async_trait::async_trait;

use crate::domain::foundation::{CategoryId, DomainError, UserId};
use crate::domain::recommendation::PreferenceWeights;

/// Buyer category preferences.
///
/// Weights are unique per (buyer, category); writes replace.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// The buyer's weights. Unknown buyers get an empty mapping, not an error.
    async fn weights_for(&self, buyer_id: &UserId) -> Result<PreferenceWeights, DomainError>;

    /// Insert or replace the weight for a (buyer, category) pair.
    async fn upsert(
        &self,
        buyer_id: &UserId,
        category_id: CategoryId,
        weight: u32,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn PreferenceStore) {}
    }
}
