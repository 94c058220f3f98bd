//! DiscardPurchaseHandler - Command handler for refunding/discarding a purchase.

use std::sync::Arc;

use crate::domain::foundation::{PurchaseId, UserId};
use crate::domain::purchase::{Purchase, PurchaseError};
use crate::ports::PurchaseLedger;

/// Command to discard one of the buyer's purchases.
#[derive(Debug, Clone)]
pub struct DiscardPurchaseCommand {
    pub buyer_id: UserId,
    pub purchase_id: PurchaseId,
}

/// Handler for discarding purchases.
///
/// A purchase belonging to someone else is reported as not found.
pub struct DiscardPurchaseHandler {
    ledger: Arc<dyn PurchaseLedger>,
}

impl DiscardPurchaseHandler {
    pub fn new(ledger: Arc<dyn PurchaseLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, cmd: DiscardPurchaseCommand) -> Result<Purchase, PurchaseError> {
        let existing = self
            .ledger
            .find_by_id(&cmd.purchase_id)
            .await
            .map_err(|e| PurchaseError::infrastructure(e.to_string()))?
            .filter(|p| p.buyer_id == cmd.buyer_id)
            .ok_or(PurchaseError::not_found(cmd.purchase_id))?;

        if !existing.is_active {
            return Err(PurchaseError::already_discarded(existing.id));
        }

        let discarded = self.ledger.discard(&cmd.purchase_id).await?;

        tracing::info!(
            purchase_id = %discarded.id,
            buyer_id = %discarded.buyer_id,
            composition_id = %discarded.composition_id,
            "purchase discarded"
        );
        Ok(discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMarketplace;
    use crate::domain::catalog::Composition;
    use crate::domain::foundation::{CompositionId, Price, Timestamp};
    use crate::ports::PopularityStats;

    async fn purchased() -> (Arc<InMemoryMarketplace>, Purchase) {
        let store = Arc::new(InMemoryMarketplace::new());
        let composition = Composition::publish(
            CompositionId::new(),
            "Sicut Cervus",
            UserId::new("composer-1").unwrap(),
            "Giovanni",
            Price::from_cents(500).unwrap(),
            Timestamp::now(),
        );
        store.add_composition(composition.clone()).await;

        let purchase = Purchase::create(
            PurchaseId::new(),
            UserId::new("buyer-1").unwrap(),
            composition.id,
            composition.price,
            "pay_1",
            Timestamp::now(),
        );
        store.record_purchase(&purchase).await.unwrap();
        (store, purchase)
    }

    fn command(purchase: &Purchase) -> DiscardPurchaseCommand {
        DiscardPurchaseCommand {
            buyer_id: purchase.buyer_id.clone(),
            purchase_id: purchase.id,
        }
    }

    #[tokio::test]
    async fn discard_deactivates_and_decrements() {
        let (store, purchase) = purchased().await;
        let handler = DiscardPurchaseHandler::new(store.clone());

        let discarded = handler.handle(command(&purchase)).await.unwrap();

        assert!(!discarded.is_active);
        assert!(discarded.discarded_at.is_some());
        let counts = store.stats_for(&purchase.composition_id).await.unwrap();
        assert_eq!(counts.purchases, 0);
    }

    #[tokio::test]
    async fn discarding_twice_fails() {
        let (store, purchase) = purchased().await;
        let handler = DiscardPurchaseHandler::new(store.clone());
        handler.handle(command(&purchase)).await.unwrap();

        let err = handler.handle(command(&purchase)).await.unwrap_err();

        assert_eq!(err, PurchaseError::AlreadyDiscarded(purchase.id));
        let counts = store.stats_for(&purchase.composition_id).await.unwrap();
        assert_eq!(counts.purchases, 0);
    }

    #[tokio::test]
    async fn other_buyers_purchase_is_not_found() {
        let (store, purchase) = purchased().await;
        let handler = DiscardPurchaseHandler::new(store.clone());
        let cmd = DiscardPurchaseCommand {
            buyer_id: UserId::new("intruder").unwrap(),
            purchase_id: purchase.id,
        };

        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err, PurchaseError::NotFound(purchase.id));
        assert_eq!(store.active_purchase_count(&purchase.composition_id).await, 1);
    }

    #[tokio::test]
    async fn unknown_purchase_is_not_found() {
        let (store, _) = purchased().await;
        let handler = DiscardPurchaseHandler::new(store);
        let missing = PurchaseId::new();

        let err = handler
            .handle(DiscardPurchaseCommand {
                buyer_id: UserId::new("buyer-1").unwrap(),
                purchase_id: missing,
            })
            .await
            .unwrap_err();

        assert_eq!(err, PurchaseError::NotFound(missing));
    }
}
