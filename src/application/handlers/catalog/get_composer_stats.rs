//! GetComposerStatsHandler - Query handler for the composer dashboard.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CompositionId, Price, UserId};
use crate::domain::recommendation::counts_for;
use crate::ports::{CompositionCatalog, PopularityStats};

#[derive(Debug, Clone)]
pub struct GetComposerStatsQuery {
    pub composer_id: UserId,
}

/// Per-composition figures on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStats {
    pub composition_id: CompositionId,
    pub title: String,
    pub is_published: bool,
    pub price: Price,
    pub views: u64,
    pub purchases: u64,
    /// purchases × price
    pub revenue: Price,
}

/// Totals across the composer's non-deleted compositions.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerStats {
    pub composer_id: UserId,
    pub total_compositions: usize,
    pub total_views: u64,
    pub total_purchases: u64,
    pub total_revenue: Price,
    pub compositions: Vec<CompositionStats>,
}

pub struct GetComposerStatsHandler {
    catalog: Arc<dyn CompositionCatalog>,
    stats: Arc<dyn PopularityStats>,
}

impl GetComposerStatsHandler {
    pub fn new(catalog: Arc<dyn CompositionCatalog>, stats: Arc<dyn PopularityStats>) -> Self {
        Self { catalog, stats }
    }

    pub async fn handle(&self, query: GetComposerStatsQuery) -> Result<ComposerStats, CatalogError> {
        let compositions = self
            .catalog
            .list_by_composer(&query.composer_id)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;

        let ids: Vec<CompositionId> = compositions.iter().map(|c| c.id).collect();
        let stats = self
            .stats
            .stats_for_many(&ids)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;

        let mut rows = Vec::with_capacity(compositions.len());
        for composition in compositions {
            let counts = counts_for(&stats, &composition.id);
            rows.push(CompositionStats {
                composition_id: composition.id,
                title: composition.title,
                is_published: composition.is_published,
                price: composition.price,
                views: counts.views,
                purchases: counts.purchases,
                revenue: cents(composition.price.times(counts.purchases))?,
            });
        }

        let revenue = rows
            .iter()
            .fold(0i64, |acc, row| acc.saturating_add(row.revenue.cents()));

        Ok(ComposerStats {
            composer_id: query.composer_id,
            total_compositions: rows.len(),
            total_views: rows.iter().map(|r| r.views).sum(),
            total_purchases: rows.iter().map(|r| r.purchases).sum(),
            total_revenue: cents(revenue)?,
            compositions: rows,
        })
    }
}

fn cents(amount: i64) -> Result<Price, CatalogError> {
    Price::from_cents(amount).map_err(|e| CatalogError::infrastructure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMarketplace;
    use crate::domain::catalog::Composition;
    use crate::domain::foundation::Timestamp;
    use crate::domain::recommendation::PopularityCounts;

    fn composer() -> UserId {
        UserId::new("composer-1").unwrap()
    }

    fn composition(title: &str, cents: i64, created_secs: i64) -> Composition {
        Composition::publish(
            CompositionId::new(),
            title,
            composer(),
            "Ola",
            Price::from_cents(cents).unwrap(),
            Timestamp::from_unix_secs(1_700_000_000 + created_secs),
        )
    }

    #[tokio::test]
    async fn totals_views_purchases_and_revenue() {
        let store = Arc::new(InMemoryMarketplace::new());
        let a = composition("A", 1000, 0);
        let b = composition("B", 250, 10);
        store.add_composition(a.clone()).await;
        store.add_composition(b.clone()).await;
        store.set_counts(a.id, PopularityCounts::new(40, 3)).await;
        store.set_counts(b.id, PopularityCounts::new(8, 4)).await;

        let stats = GetComposerStatsHandler::new(store.clone(), store.clone())
            .handle(GetComposerStatsQuery {
                composer_id: composer(),
            })
            .await
            .unwrap();

        assert_eq!(stats.total_compositions, 2);
        assert_eq!(stats.total_views, 48);
        assert_eq!(stats.total_purchases, 7);
        assert_eq!(stats.total_revenue.cents(), 3000 + 1000);
        assert_eq!(stats.compositions[0].composition_id, b.id);
        assert_eq!(stats.compositions[0].revenue.cents(), 1000);
    }

    #[tokio::test]
    async fn unpublished_counts_but_deleted_does_not() {
        let store = Arc::new(InMemoryMarketplace::new());
        let draft = composition("Draft", 100, 0);
        let removed = composition("Removed", 100, 1);
        store.add_composition(draft.clone()).await;
        store.add_composition(removed.clone()).await;
        store.unpublish(&draft.id).await;
        store.soft_delete(&removed.id).await;

        let stats = GetComposerStatsHandler::new(store.clone(), store.clone())
            .handle(GetComposerStatsQuery {
                composer_id: composer(),
            })
            .await
            .unwrap();

        assert_eq!(stats.total_compositions, 1);
        assert!(!stats.compositions[0].is_published);
    }

    #[tokio::test]
    async fn composer_without_works_has_zero_totals() {
        let store = Arc::new(InMemoryMarketplace::new());
        let stats = GetComposerStatsHandler::new(store.clone(), store)
            .handle(GetComposerStatsQuery {
                composer_id: UserId::new("newcomer").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(stats.total_compositions, 0);
        assert_eq!(stats.total_revenue, Price::FREE);
    }
}
