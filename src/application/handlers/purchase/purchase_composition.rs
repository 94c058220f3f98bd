//! PurchaseCompositionHandler - Command handler for buying a composition.

use std::sync::Arc;

use crate::domain::foundation::{CompositionId, PurchaseId, Timestamp, UserId};
use crate::domain::purchase::{Purchase, PurchaseError};
use crate::ports::{CompositionCatalog, PurchaseLedger};

/// Command to purchase a composition.
#[derive(Debug, Clone)]
pub struct PurchaseCompositionCommand {
    pub buyer_id: UserId,
    pub composition_id: CompositionId,
    /// Reference returned by the payment provider once payment cleared.
    pub payment_ref: String,
}

/// Handler for recording a purchase.
///
/// The price is taken from the catalog at purchase time. The ledger applies
/// the purchase row and the popularity counter together.
pub struct PurchaseCompositionHandler {
    catalog: Arc<dyn CompositionCatalog>,
    ledger: Arc<dyn PurchaseLedger>,
}

impl PurchaseCompositionHandler {
    pub fn new(catalog: Arc<dyn CompositionCatalog>, ledger: Arc<dyn PurchaseLedger>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn handle(&self, cmd: PurchaseCompositionCommand) -> Result<Purchase, PurchaseError> {
        let payment_ref = cmd.payment_ref.trim();
        if payment_ref.is_empty() {
            return Err(PurchaseError::validation("payment_ref", "must not be empty"));
        }

        // 1. The composition must be listed for sale
        let composition = self
            .catalog
            .find_by_id(&cmd.composition_id)
            .await
            .map_err(|e| PurchaseError::infrastructure(e.to_string()))?
            .filter(|c| c.is_eligible())
            .ok_or(PurchaseError::composition_unavailable(cmd.composition_id))?;

        // 2. Record it; ownership and eligibility are re-checked atomically
        let purchase = Purchase::create(
            PurchaseId::new(),
            cmd.buyer_id,
            composition.id,
            composition.price,
            payment_ref,
            Timestamp::now(),
        );
        self.ledger.record_purchase(&purchase).await.map_err(|e| {
            let err = PurchaseError::from(e);
            tracing::debug!(
                buyer_id = %purchase.buyer_id,
                composition_id = %purchase.composition_id,
                code = %err.code(),
                "purchase rejected"
            );
            err
        })?;

        tracing::info!(
            purchase_id = %purchase.id,
            buyer_id = %purchase.buyer_id,
            composition_id = %purchase.composition_id,
            price = %purchase.price_paid,
            "composition purchased"
        );
        Ok(purchase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMarketplace;
    use crate::domain::catalog::Composition;
    use crate::domain::foundation::{ErrorCode, Price};
    use crate::ports::PopularityStats;

    fn buyer() -> UserId {
        UserId::new("buyer-1").unwrap()
    }

    fn composition() -> Composition {
        Composition::publish(
            CompositionId::new(),
            "Ubi Caritas",
            UserId::new("composer-1").unwrap(),
            "Maurice",
            Price::from_cents(1599).unwrap(),
            Timestamp::now(),
        )
    }

    fn command(composition_id: CompositionId) -> PurchaseCompositionCommand {
        PurchaseCompositionCommand {
            buyer_id: buyer(),
            composition_id,
            payment_ref: "pay_123".to_string(),
        }
    }

    async fn setup() -> (Arc<InMemoryMarketplace>, PurchaseCompositionHandler, Composition) {
        let store = Arc::new(InMemoryMarketplace::new());
        let c = composition();
        store.add_composition(c.clone()).await;
        let handler = PurchaseCompositionHandler::new(store.clone(), store.clone());
        (store, handler, c)
    }

    #[tokio::test]
    async fn purchase_captures_catalog_price_and_counts() {
        let (store, handler, c) = setup().await;

        let purchase = handler.handle(command(c.id)).await.unwrap();

        assert!(purchase.is_active);
        assert_eq!(purchase.price_paid.cents(), 1599);
        assert_eq!(purchase.payment_ref, "pay_123");
        assert_eq!(store.stats_for(&c.id).await.unwrap().purchases, 1);
    }

    #[tokio::test]
    async fn second_purchase_is_already_owned() {
        let (store, handler, c) = setup().await;
        handler.handle(command(c.id)).await.unwrap();

        let err = handler.handle(command(c.id)).await.unwrap_err();

        assert_eq!(err, PurchaseError::AlreadyOwned(c.id));
        assert_eq!(store.stats_for(&c.id).await.unwrap().purchases, 1);
    }

    #[tokio::test]
    async fn unknown_composition_is_unavailable() {
        let (_, handler, _) = setup().await;
        let missing = CompositionId::new();

        let err = handler.handle(command(missing)).await.unwrap_err();
        assert_eq!(err, PurchaseError::CompositionUnavailable(missing));
    }

    #[tokio::test]
    async fn unpublished_composition_is_unavailable() {
        let (store, handler, c) = setup().await;
        store.unpublish(&c.id).await;

        let err = handler.handle(command(c.id)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CompositionUnavailable);
    }

    #[tokio::test]
    async fn blank_payment_ref_is_rejected() {
        let (_, handler, c) = setup().await;
        let cmd = PurchaseCompositionCommand {
            payment_ref: "   ".to_string(),
            ..command(c.id)
        };

        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
