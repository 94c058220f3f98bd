//! In-memory implementation of the catalog, preference, popularity and
//! purchase ports.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{by_name, unknown_category, Category, Composition, CompositionFilter};
use crate::domain::foundation::{
    CategoryId, CompositionId, DomainError, ErrorCode, PurchaseId, Timestamp, UserId,
};
use crate::domain::purchase::Purchase;
use crate::domain::recommendation::{PopularityCounts, PopularityStat, PreferenceWeights};
use crate::ports::{CompositionCatalog, PopularityStats, PreferenceStore, PurchaseLedger};

/// Marketplace data held in memory.
///
/// One `RwLock` guards all tables. Purchase and discard take the write lock
/// once and update both the ledger and the counter under it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplace {
    state: Arc<RwLock<MarketplaceState>>,
}

#[derive(Debug, Default)]
struct MarketplaceState {
    categories: BTreeMap<CategoryId, String>,
    compositions: HashMap<CompositionId, Composition>,
    stats: HashMap<CompositionId, PopularityStat>,
    purchases: HashMap<PurchaseId, Purchase>,
    preferences: HashMap<UserId, PreferenceWeights>,
}

impl MarketplaceState {
    fn stat_mut(&mut self, id: CompositionId, at: Timestamp) -> &mut PopularityStat {
        self.stats
            .entry(id)
            .or_insert_with(|| PopularityStat::zeroed(id, at))
    }

    fn newest_first(mut compositions: Vec<Composition>) -> Vec<Composition> {
        compositions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        compositions
    }
}

impl InMemoryMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or renames) a category.
    pub async fn add_category(&self, id: CategoryId, name: impl Into<String>) {
        self.state.write().await.categories.insert(id, name.into());
    }

    /// Adds (or replaces) a composition and gives it a zeroed stat row.
    ///
    /// The composition's category is registered if it is not known yet.
    pub async fn add_composition(&self, composition: Composition) {
        let mut state = self.state.write().await;
        if let (Some(category_id), Some(name)) =
            (composition.category_id, composition.category_name.as_ref())
        {
            state
                .categories
                .entry(category_id)
                .or_insert_with(|| name.clone());
        }
        let id = composition.id;
        let created_at = composition.created_at;
        state.compositions.insert(id, composition);
        state
            .stats
            .insert(id, PopularityStat::zeroed(id, created_at));
    }

    /// Overwrites a composition's counters. Seeding helper for tests and demos.
    pub async fn set_counts(&self, id: CompositionId, counts: PopularityCounts) {
        let mut state = self.state.write().await;
        let stat = state.stat_mut(id, Timestamp::now());
        stat.counts = counts;
    }

    /// Drops a composition's stat row, leaving the composition in place.
    pub async fn remove_stats(&self, id: &CompositionId) {
        self.state.write().await.stats.remove(id);
    }

    /// Moderation: withdraw from sale. Returns false if unknown.
    pub async fn unpublish(&self, id: &CompositionId) -> bool {
        let mut state = self.state.write().await;
        match state.compositions.get_mut(id) {
            Some(composition) => {
                composition.unpublish();
                true
            }
            None => false,
        }
    }

    /// Moderation: soft-delete. Returns false if unknown.
    pub async fn soft_delete(&self, id: &CompositionId) -> bool {
        let mut state = self.state.write().await;
        match state.compositions.get_mut(id) {
            Some(composition) => {
                composition.soft_delete();
                true
            }
            None => false,
        }
    }

    /// Number of active purchases of a composition, straight from the ledger.
    pub async fn active_purchase_count(&self, id: &CompositionId) -> u64 {
        let state = self.state.read().await;
        state.purchases.values().filter(|p| p.owns(id)).count() as u64
    }
}

#[async_trait]
impl CompositionCatalog for InMemoryMarketplace {
    async fn eligible_compositions(
        &self,
        excluding: &HashSet<CompositionId>,
    ) -> Result<Vec<Composition>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .compositions
            .values()
            .filter(|c| c.is_eligible() && !excluding.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list(&self, filter: &CompositionFilter) -> Result<Vec<Composition>, DomainError> {
        let state = self.state.read().await;
        let matching = state
            .compositions
            .values()
            .filter(|c| c.is_eligible() && filter.matches(c))
            .cloned()
            .collect();
        Ok(MarketplaceState::newest_first(matching))
    }

    async fn find_by_id(&self, id: &CompositionId) -> Result<Option<Composition>, DomainError> {
        Ok(self.state.read().await.compositions.get(id).cloned())
    }

    async fn list_by_composer(
        &self,
        composer_id: &UserId,
    ) -> Result<Vec<Composition>, DomainError> {
        let state = self.state.read().await;
        let owned = state
            .compositions
            .values()
            .filter(|c| !c.deleted && &c.composer_id == composer_id)
            .cloned()
            .collect();
        Ok(MarketplaceState::newest_first(owned))
    }

    async fn categories(&self) -> Result<Vec<Category>, DomainError> {
        let state = self.state.read().await;
        Ok(by_name(
            state
                .categories
                .iter()
                .map(|(id, name)| Category::new(*id, name.clone()))
                .collect(),
        ))
    }
}

#[async_trait]
impl PreferenceStore for InMemoryMarketplace {
    async fn weights_for(&self, buyer_id: &UserId) -> Result<PreferenceWeights, DomainError> {
        let state = self.state.read().await;
        Ok(state.preferences.get(buyer_id).cloned().unwrap_or_default())
    }

    async fn upsert(
        &self,
        buyer_id: &UserId,
        category_id: CategoryId,
        weight: u32,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&category_id) {
            return Err(unknown_category(category_id));
        }
        state
            .preferences
            .entry(buyer_id.clone())
            .or_default()
            .set(category_id, weight);
        Ok(())
    }
}

#[async_trait]
impl PopularityStats for InMemoryMarketplace {
    async fn stats_for(&self, id: &CompositionId) -> Result<PopularityCounts, DomainError> {
        let state = self.state.read().await;
        Ok(state.stats.get(id).map(|s| s.counts).unwrap_or_default())
    }

    async fn stats_for_many(
        &self,
        ids: &[CompositionId],
    ) -> Result<HashMap<CompositionId, PopularityCounts>, DomainError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.stats.get(id).map(|s| (*id, s.counts)))
            .collect())
    }

    async fn record_view(&self, id: &CompositionId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.stat_mut(*id, Timestamp::now()).record_view(Timestamp::now());
        Ok(())
    }
}

#[async_trait]
impl PurchaseLedger for InMemoryMarketplace {
    async fn active_composition_ids(
        &self,
        buyer_id: &UserId,
    ) -> Result<HashSet<CompositionId>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .purchases
            .values()
            .filter(|p| p.is_active && &p.buyer_id == buyer_id)
            .map(|p| p.composition_id)
            .collect())
    }

    async fn record_purchase(&self, purchase: &Purchase) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        let eligible = state
            .compositions
            .get(&purchase.composition_id)
            .map(Composition::is_eligible)
            .unwrap_or(false);
        if !eligible {
            return Err(DomainError::new(
                ErrorCode::CompositionUnavailable,
                "Composition is not available for purchase",
            )
            .with_detail("composition_id", purchase.composition_id.to_string()));
        }

        let already_owned = state
            .purchases
            .values()
            .any(|p| p.buyer_id == purchase.buyer_id && p.owns(&purchase.composition_id));
        if already_owned {
            return Err(DomainError::new(
                ErrorCode::AlreadyOwned,
                "Buyer already owns this composition",
            )
            .with_detail("composition_id", purchase.composition_id.to_string()));
        }

        state.purchases.insert(purchase.id, purchase.clone());
        state
            .stat_mut(purchase.composition_id, purchase.purchased_at)
            .record_purchase(purchase.purchased_at);
        Ok(())
    }

    async fn discard(&self, purchase_id: &PurchaseId) -> Result<Purchase, DomainError> {
        let mut state = self.state.write().await;
        let now = Timestamp::now();

        let purchase = state.purchases.get_mut(purchase_id).ok_or_else(|| {
            DomainError::new(ErrorCode::PurchaseNotFound, "Purchase not found")
                .with_detail("purchase_id", purchase_id.to_string())
        })?;
        purchase.discard(now).map_err(|e| {
            DomainError::new(e.code(), e.message())
                .with_detail("purchase_id", purchase_id.to_string())
        })?;
        let discarded = purchase.clone();

        state
            .stat_mut(discarded.composition_id, now)
            .record_discard(now);
        Ok(discarded)
    }

    async fn find_by_id(&self, purchase_id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
        Ok(self.state.read().await.purchases.get(purchase_id).cloned())
    }

    async fn list_active_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Purchase>, DomainError> {
        let state = self.state.read().await;
        let mut active: Vec<Purchase> = state
            .purchases
            .values()
            .filter(|p| p.is_active && &p.buyer_id == buyer_id)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        Ok(active)
    }
}
