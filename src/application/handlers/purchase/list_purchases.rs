//! ListPurchasesHandler - Query handler for a buyer's library.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::purchase::{Purchase, PurchaseError};
use crate::ports::PurchaseLedger;

#[derive(Debug, Clone)]
pub struct ListPurchasesQuery {
    pub buyer_id: UserId,
}

/// Active purchases, newest first.
pub type ListPurchasesResult = Vec<Purchase>;

pub struct ListPurchasesHandler {
    ledger: Arc<dyn PurchaseLedger>,
}

impl ListPurchasesHandler {
    pub fn new(ledger: Arc<dyn PurchaseLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: ListPurchasesQuery) -> Result<ListPurchasesResult, PurchaseError> {
        self.ledger
            .list_active_for_buyer(&query.buyer_id)
            .await
            .map_err(|e| PurchaseError::infrastructure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMarketplace;
    use crate::domain::catalog::Composition;
    use crate::domain::foundation::{CompositionId, Price, PurchaseId, Timestamp};

    #[tokio::test]
    async fn lists_only_active_purchases_newest_first() {
        let store = Arc::new(InMemoryMarketplace::new());
        let buyer = UserId::new("buyer-1").unwrap();
        let mut purchases = Vec::new();
        for i in 0..3 {
            let c = Composition::publish(
                CompositionId::new(),
                format!("Motet {}", i),
                UserId::new("composer-1").unwrap(),
                "Tomás",
                Price::from_cents(300).unwrap(),
                Timestamp::now(),
            );
            store.add_composition(c.clone()).await;
            let p = Purchase::create(
                PurchaseId::new(),
                buyer.clone(),
                c.id,
                c.price,
                "pay",
                Timestamp::from_unix_secs(1_700_000_000 + i * 60),
            );
            store.record_purchase(&p).await.unwrap();
            purchases.push(p);
        }
        store.discard(&purchases[1].id).await.unwrap();

        let result = ListPurchasesHandler::new(store)
            .handle(ListPurchasesQuery { buyer_id: buyer })
            .await
            .unwrap();

        let ids: Vec<_> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![purchases[2].id, purchases[0].id]);
    }

    #[tokio::test]
    async fn buyer_without_purchases_gets_empty_list() {
        let result = ListPurchasesHandler::new(Arc::new(InMemoryMarketplace::new()))
            .handle(ListPurchasesQuery {
                buyer_id: UserId::new("nobody").unwrap(),
            })
            .await
            .unwrap();
        assert!(result.is_empty());
    }
}
