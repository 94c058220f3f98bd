//! GetRecommendationsHandler - Query handler for the "For You" feed.
//!
//! Runs the three ranking stages in order:
//!
//! 1. fetch the buyer's weights, owned ids, eligible candidates and their stats
//! 2. [`score_candidates`]
//! 3. [`rank`]
//!
//! The handler only reads. Any collaborator failure aborts the whole request
//! with `DataUnavailable`; there are no partial results and no retries.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RecommendationConfig;
use crate::domain::catalog::Composition;
use crate::domain::foundation::{CompositionId, DomainError, UserId};
use crate::domain::recommendation::{
    rank, score_candidates, PopularityCounts, PreferenceWeights, RecommendationError,
    RecommendationLimit, ScoredComposition, ScoringWeights,
};
use crate::ports::{CompositionCatalog, PopularityStats, PreferenceStore, PurchaseLedger};

/// Query for a buyer's recommendations.
#[derive(Debug, Clone)]
pub struct GetRecommendationsQuery {
    pub buyer_id: UserId,
    /// Requested size; the configured default applies when absent.
    pub limit: Option<i64>,
}

/// Best-first recommendations, at most `limit` long.
pub type GetRecommendationsResult = Vec<ScoredComposition>;

/// Tuning for the handler.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationSettings {
    pub weights: ScoringWeights,
    pub default_limit: RecommendationLimit,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            default_limit: RecommendationLimit::DEFAULT,
        }
    }
}

impl From<&RecommendationConfig> for RecommendationSettings {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            weights: config.weights,
            default_limit: config.default_limit(),
        }
    }
}

/// Everything the scoring stage needs, gathered in the fetch stage.
struct Candidates {
    preferences: PreferenceWeights,
    compositions: Vec<Composition>,
    stats: HashMap<CompositionId, PopularityCounts>,
}

pub struct GetRecommendationsHandler {
    catalog: Arc<dyn CompositionCatalog>,
    preferences: Arc<dyn PreferenceStore>,
    stats: Arc<dyn PopularityStats>,
    ledger: Arc<dyn PurchaseLedger>,
    settings: RecommendationSettings,
}

impl GetRecommendationsHandler {
    pub fn new(
        catalog: Arc<dyn CompositionCatalog>,
        preferences: Arc<dyn PreferenceStore>,
        stats: Arc<dyn PopularityStats>,
        ledger: Arc<dyn PurchaseLedger>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            catalog,
            preferences,
            stats,
            ledger,
            settings,
        }
    }

    pub async fn handle(
        &self,
        query: GetRecommendationsQuery,
    ) -> Result<GetRecommendationsResult, RecommendationError> {
        // Validated before any port is touched.
        let limit = match query.limit {
            Some(requested) => RecommendationLimit::new(requested)?,
            None => self.settings.default_limit,
        };

        let candidates = self.fetch(&query.buyer_id).await.map_err(|e| {
            tracing::warn!(buyer_id = %query.buyer_id, error = %e, "recommendation fetch failed");
            RecommendationError::from(e)
        })?;

        let scored = score_candidates(
            candidates.compositions,
            &candidates.preferences,
            &candidates.stats,
            &self.settings.weights,
        );
        let ranked = rank(scored, limit);

        tracing::debug!(
            buyer_id = %query.buyer_id,
            limit = limit.get(),
            preferences = candidates.preferences.len(),
            returned = ranked.len(),
            "recommendations ranked"
        );
        Ok(ranked)
    }

    async fn fetch(&self, buyer_id: &UserId) -> Result<Candidates, DomainError> {
        let (preferences, owned) = futures::try_join!(
            self.preferences.weights_for(buyer_id),
            self.ledger.active_composition_ids(buyer_id)
        )?;

        let compositions = self.catalog.eligible_compositions(&owned).await?;
        if compositions.is_empty() {
            return Ok(Candidates {
                preferences,
                compositions,
                stats: HashMap::new(),
            });
        }

        let ids: Vec<CompositionId> = compositions.iter().map(|c| c.id).collect();
        let stats = self.stats.stats_for_many(&ids).await?;

        Ok(Candidates {
            preferences,
            compositions,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMarketplace;
    use crate::domain::catalog::{Category, CompositionFilter};
    use crate::domain::foundation::{
        CategoryId, ErrorCode, Price, PurchaseId, Timestamp,
    };
    use crate::domain::purchase::Purchase;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    /// Counts every port call and fails the selected fetch.
    #[derive(Default)]
    struct MockPorts {
        calls: AtomicUsize,
        fail_catalog: bool,
        fail_preferences: bool,
        fail_stats: bool,
        fail_ledger: bool,
    }

    impl MockPorts {
        fn touch(&self, fail: bool, what: &str) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if fail {
                return Err(DomainError::database(format!("Simulated {} failure", what)));
            }
            Ok(())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompositionCatalog for MockPorts {
        async fn eligible_compositions(
            &self,
            _excluding: &HashSet<CompositionId>,
        ) -> Result<Vec<Composition>, DomainError> {
            self.touch(self.fail_catalog, "catalog")?;
            Ok(vec![composition("Only", None, 0)])
        }

        async fn list(&self, _filter: &CompositionFilter) -> Result<Vec<Composition>, DomainError> {
            self.touch(self.fail_catalog, "catalog")?;
            Ok(vec![])
        }

        async fn find_by_id(&self, _id: &CompositionId) -> Result<Option<Composition>, DomainError> {
            self.touch(self.fail_catalog, "catalog")?;
            Ok(None)
        }

        async fn list_by_composer(
            &self,
            _composer_id: &UserId,
        ) -> Result<Vec<Composition>, DomainError> {
            self.touch(self.fail_catalog, "catalog")?;
            Ok(vec![])
        }
        async fn categories(&self) -> Result<Vec<Category>, DomainError> {
            self.touch(self.fail_catalog, "catalog")?;
            Ok(vec![])
        }
    }

    #[async_trait]
    impl PreferenceStore for MockPorts {
        async fn weights_for(&self, _buyer_id: &UserId) -> Result<PreferenceWeights, DomainError> {
            self.touch(self.fail_preferences, "preference")?;
            Ok(PreferenceWeights::new())
        }

        async fn upsert(
            &self,
            _buyer_id: &UserId,
            _category_id: CategoryId,
            _weight: u32,
        ) -> Result<(), DomainError> {
            self.touch(self.fail_preferences, "preference")
        }
    }

    #[async_trait]
    impl PopularityStats for MockPorts {
        async fn stats_for(&self, _id: &CompositionId) -> Result<PopularityCounts, DomainError> {
            self.touch(self.fail_stats, "stats")?;
            Ok(PopularityCounts::default())
        }

        async fn stats_for_many(
            &self,
            _ids: &[CompositionId],
        ) -> Result<HashMap<CompositionId, PopularityCounts>, DomainError> {
            self.touch(self.fail_stats, "stats")?;
            Ok(HashMap::new())
        }

        async fn record_view(&self, _id: &CompositionId) -> Result<(), DomainError> {
            self.touch(self.fail_stats, "stats")
        }
    }

    #[async_trait]
    impl PurchaseLedger for MockPorts {
        async fn active_composition_ids(
            &self,
            _buyer_id: &UserId,
        ) -> Result<HashSet<CompositionId>, DomainError> {
            self.touch(self.fail_ledger, "ledger")?;
            Ok(HashSet::new())
        }

        async fn record_purchase(&self, _purchase: &Purchase) -> Result<(), DomainError> {
            self.touch(self.fail_ledger, "ledger")
        }

        async fn discard(&self, purchase_id: &PurchaseId) -> Result<Purchase, DomainError> {
            self.touch(self.fail_ledger, "ledger")?;
            Err(DomainError::new(ErrorCode::PurchaseNotFound, "missing")
                .with_detail("purchase_id", purchase_id.to_string()))
        }

        async fn find_by_id(&self, _purchase_id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
            self.touch(self.fail_ledger, "ledger")?;
            Ok(None)
        }

        async fn list_active_for_buyer(&self, _buyer_id: &UserId) -> Result<Vec<Purchase>, DomainError> {
            self.touch(self.fail_ledger, "ledger")?;
            Ok(vec![])
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn buyer() -> UserId {
        UserId::new("buyer-1").unwrap()
    }

    fn composition(title: &str, category: Option<(i32, &str)>, created_secs: i64) -> Composition {
        let c = Composition::publish(
            CompositionId::new(),
            title,
            UserId::new("composer-1").unwrap(),
            "Hildegard",
            Price::from_cents(1200).unwrap(),
            Timestamp::from_unix_secs(1_700_000_000 + created_secs),
        );
        match category {
            Some((id, name)) => c.with_category(CategoryId::new(id), name),
            None => c,
        }
    }

    fn handler_over(store: &Arc<InMemoryMarketplace>) -> GetRecommendationsHandler {
        GetRecommendationsHandler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            RecommendationSettings::default(),
        )
    }

    fn handler_over_mock(ports: &Arc<MockPorts>) -> GetRecommendationsHandler {
        GetRecommendationsHandler::new(
            ports.clone(),
            ports.clone(),
            ports.clone(),
            ports.clone(),
            RecommendationSettings::default(),
        )
    }

    fn query(limit: Option<i64>) -> GetRecommendationsQuery {
        GetRecommendationsQuery {
            buyer_id: buyer(),
            limit,
        }
    }

    async fn buy(store: &InMemoryMarketplace, buyer: &UserId, id: CompositionId) -> Purchase {
        let purchase = Purchase::create(
            PurchaseId::new(),
            buyer.clone(),
            id,
            Price::from_cents(1200).unwrap(),
            "mock_ref",
            Timestamp::now(),
        );
        store.record_purchase(&purchase).await.unwrap();
        purchase
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Scenario Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn preference_weight_outranks_raw_popularity() {
        let store = Arc::new(InMemoryMarketplace::new());
        let a = composition("A", Some((1, "Sacred")), 0);
        let b = composition("B", Some((2, "Secular")), 0);
        store.add_composition(a.clone()).await;
        store.add_composition(b.clone()).await;
        store.set_counts(a.id, PopularityCounts::new(10, 3)).await;
        store.set_counts(b.id, PopularityCounts::new(5, 10)).await;
        store.upsert(&buyer(), CategoryId::new(1), 5).await.unwrap();

        let result = handler_over(&store).handle(query(None)).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].composition_id, a.id);
        assert!((result[0].score - 57.0).abs() < 1e-9);
        assert_eq!(result[1].composition_id, b.id);
        assert!((result[1].score - 20.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn owned_composition_never_appears() {
        let store = Arc::new(InMemoryMarketplace::new());
        let x = composition("X", None, 0);
        let other = composition("Other", None, 1);
        store.add_composition(x.clone()).await;
        store.add_composition(other.clone()).await;
        store.set_counts(x.id, PopularityCounts::new(1_000, 500)).await;
        buy(&store, &buyer(), x.id).await;

        let result = handler_over(&store).handle(query(Some(20))).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].composition_id, other.id);
    }

    #[tokio::test]
    async fn discarded_purchase_becomes_eligible_again() {
        let store = Arc::new(InMemoryMarketplace::new());
        let y = composition("Y", None, 0);
        store.add_composition(y.clone()).await;
        let someone_else = UserId::new("buyer-2").unwrap();
        buy(&store, &someone_else, y.id).await;
        let mine = buy(&store, &buyer(), y.id).await;
        store.discard(&mine.id).await.unwrap();

        let result = handler_over(&store).handle(query(None)).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].composition_id, y.id);
        // Only the other buyer's purchase still counts: 1 * 2.
        assert!((result[0].score - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn non_positive_limit_fails_before_any_fetch() {
        let ports = Arc::new(MockPorts::default());
        let handler = handler_over_mock(&ports);

        for limit in [0, -1] {
            let err = handler.handle(query(Some(limit))).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidArgument);
        }
        assert_eq!(ports.calls(), 0);
    }

    #[tokio::test]
    async fn empty_catalog_returns_empty_list() {
        let store = Arc::new(InMemoryMarketplace::new());
        let result = handler_over(&store).handle(query(Some(20))).await.unwrap();
        assert!(result.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Limit and Ordering Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn large_limit_returns_every_eligible_composition() {
        let store = Arc::new(InMemoryMarketplace::new());
        for i in 0..3 {
            store.add_composition(composition(&format!("C{}", i), None, i)).await;
        }

        let result = handler_over(&store).handle(query(Some(150))).await.unwrap();
        assert_eq!(result.len(), 3);

        let result = handler_over(&store).handle(query(Some(i64::MAX))).await.unwrap();
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn default_limit_truncates_to_twenty() {
        let store = Arc::new(InMemoryMarketplace::new());
        for i in 0..25 {
            store.add_composition(composition(&format!("C{}", i), None, i)).await;
        }

        let result = handler_over(&store).handle(query(None)).await.unwrap();
        assert_eq!(result.len(), 20);
    }

    #[tokio::test]
    async fn equal_scores_rank_newest_first() {
        let store = Arc::new(InMemoryMarketplace::new());
        let older = composition("Older", None, 0);
        let newer = composition("Newer", None, 60);
        store.add_composition(older.clone()).await;
        store.add_composition(newer.clone()).await;

        let result = handler_over(&store).handle(query(Some(2))).await.unwrap();
        assert_eq!(result[0].composition_id, newer.id);
        assert_eq!(result[1].composition_id, older.id);
    }

    #[tokio::test]
    async fn unpublished_and_deleted_are_skipped() {
        let store = Arc::new(InMemoryMarketplace::new());
        let hidden = composition("Hidden", None, 0);
        let gone = composition("Gone", None, 1);
        let shown = composition("Shown", None, 2);
        for c in [&hidden, &gone, &shown] {
            store.add_composition(c.clone()).await;
        }
        store.unpublish(&hidden.id).await;
        store.soft_delete(&gone.id).await;

        let result = handler_over(&store).handle(query(None)).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].composition_id, shown.id);
    }

    #[tokio::test]
    async fn custom_weights_change_scores() {
        let store = Arc::new(InMemoryMarketplace::new());
        let c = composition("C", None, 0);
        store.add_composition(c.clone()).await;
        store.set_counts(c.id, PopularityCounts::new(10, 1)).await;

        let settings = RecommendationSettings {
            weights: ScoringWeights {
                preference: 10.0,
                purchase: 0.0,
                view: 1.0,
            },
            ..Default::default()
        };
        let handler = GetRecommendationsHandler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            settings,
        );

        let result = handler.handle(query(None)).await.unwrap();
        assert!((result[0].score - 10.0).abs() < 1e-9);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn each_port_failure_is_data_unavailable() {
        let cases = [
            MockPorts {
                fail_catalog: true,
                ..Default::default()
            },
            MockPorts {
                fail_preferences: true,
                ..Default::default()
            },
            MockPorts {
                fail_stats: true,
                ..Default::default()
            },
            MockPorts {
                fail_ledger: true,
                ..Default::default()
            },
        ];

        for ports in cases {
            let ports = Arc::new(ports);
            let err = handler_over_mock(&ports).handle(query(None)).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::DataUnavailable);
            assert!(err.is_retryable());
        }
    }

    #[tokio::test]
    async fn healthy_mock_returns_its_single_candidate() {
        let ports = Arc::new(MockPorts::default());
        let result = handler_over_mock(&ports).handle(query(Some(5))).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Only");
    }
}
