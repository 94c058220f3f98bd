//! UpdatePreferenceHandler - Command handler for setting a category weight.

use std::sync::Arc;

use crate::domain::foundation::{CategoryId, UserId};
use crate::domain::recommendation::RecommendationError;
use crate::ports::PreferenceStore;

/// Largest weight a buyer can store; the column is a signed 32-bit integer.
pub const MAX_PREFERENCE_WEIGHT: i64 = i32::MAX as i64;

/// Command to set how strongly a buyer favours a category.
#[derive(Debug, Clone)]
pub struct UpdatePreferenceCommand {
    pub buyer_id: UserId,
    pub category_id: CategoryId,
    pub weight: i64,
}

pub struct UpdatePreferenceHandler {
    store: Arc<dyn PreferenceStore>,
}

impl UpdatePreferenceHandler {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: UpdatePreferenceCommand) -> Result<u32, RecommendationError> {
        if !(0..=MAX_PREFERENCE_WEIGHT).contains(&cmd.weight) {
            return Err(RecommendationError::invalid_argument(
                "weight",
                format!("must be between 0 and {}, got {}", MAX_PREFERENCE_WEIGHT, cmd.weight),
            ));
        }
        let weight = cmd.weight as u32;

        self.store
            .upsert(&cmd.buyer_id, cmd.category_id, weight)
            .await
            .map_err(|e| {
                tracing::warn!(buyer_id = %cmd.buyer_id, error = %e, "preference upsert failed");
                RecommendationError::from(e)
            })?;

        tracing::debug!(
            buyer_id = %cmd.buyer_id,
            category_id = %cmd.category_id,
            weight,
            "preference updated"
        );
        Ok(weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMarketplace;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::recommendation::PreferenceWeights;
    use async_trait::async_trait;

    struct FailingStore;

    #[async_trait]
    impl PreferenceStore for FailingStore {
        async fn weights_for(&self, _buyer_id: &UserId) -> Result<PreferenceWeights, DomainError> {
            Err(DomainError::database("Simulated read failure"))
        }

        async fn upsert(
            &self,
            _buyer_id: &UserId,
            _category_id: CategoryId,
            _weight: u32,
        ) -> Result<(), DomainError> {
            Err(DomainError::database("Simulated write failure"))
        }
    }

    /// Store whose upsert reports a caller mistake.
    struct RejectingStore;

    #[async_trait]
    impl PreferenceStore for RejectingStore {
        async fn weights_for(&self, _buyer_id: &UserId) -> Result<PreferenceWeights, DomainError> {
            Ok(PreferenceWeights::new())
        }

        async fn upsert(
            &self,
            _buyer_id: &UserId,
            _category_id: CategoryId,
            weight: u32,
        ) -> Result<(), DomainError> {
            Err(DomainError::validation("weight", format!("Weight {} is too large", weight)))
        }
    }

    async fn store_with_category() -> Arc<InMemoryMarketplace> {
        let store = Arc::new(InMemoryMarketplace::new());
        store.add_category(CategoryId::new(3), "Contemporary").await;
        store
    }

    fn command(weight: i64) -> UpdatePreferenceCommand {
        UpdatePreferenceCommand {
            buyer_id: UserId::new("buyer-1").unwrap(),
            category_id: CategoryId::new(3),
            weight,
        }
    }

    #[tokio::test]
    async fn stores_weight_and_overwrites_previous() {
        let store = store_with_category().await;
        let handler = UpdatePreferenceHandler::new(store.clone());

        handler.handle(command(2)).await.unwrap();
        handler.handle(command(7)).await.unwrap();

        let weights = store.weights_for(&command(0).buyer_id).await.unwrap();
        assert_eq!(weights.weight_for(Some(CategoryId::new(3))), 7);
        assert_eq!(weights.len(), 1);
    }

    #[tokio::test]
    async fn zero_weight_is_allowed() {
        let handler = UpdatePreferenceHandler::new(store_with_category().await);
        assert_eq!(handler.handle(command(0)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn negative_weight_is_invalid_argument() {
        let handler = UpdatePreferenceHandler::new(Arc::new(FailingStore));
        let err = handler.handle(command(-1)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn oversized_weight_is_invalid_argument() {
        let handler = UpdatePreferenceHandler::new(Arc::new(FailingStore));
        let err = handler.handle(command(MAX_PREFERENCE_WEIGHT + 1)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn store_failure_is_data_unavailable() {
        let handler = UpdatePreferenceHandler::new(Arc::new(FailingStore));
        let err = handler.handle(command(4)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataUnavailable);
    }

    #[tokio::test]
    async fn unknown_category_is_invalid_argument() {
        let store = Arc::new(InMemoryMarketplace::new());
        let handler = UpdatePreferenceHandler::new(store.clone());

        let err = handler.handle(command(4)).await.unwrap_err();

        assert!(matches!(
            err,
            RecommendationError::InvalidArgument { ref field, .. } if field == "category_id"
        ));
        assert!(!err.is_retryable());
        assert!(store.weights_for(&command(0).buyer_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_validation_failure_is_invalid_argument() {
        let handler = UpdatePreferenceHandler::new(Arc::new(RejectingStore));
        let err = handler.handle(command(4)).await.unwrap_err();
        assert_eq!(err, RecommendationError::invalid_argument("weight", "Weight 4 is too large"));
    }
}
