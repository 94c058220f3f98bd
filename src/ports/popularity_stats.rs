//! Popularity stats port.
//!
//! Purchase counters are written by the `PurchaseLedger` inside its
//! purchase/discard transactions, so this port only exposes reads and view
//! counting.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::foundation::{CompositionId, DomainError};
use crate::domain::recommendation::PopularityCounts;

#[async_trait]
pub trait PopularityStats: Send + Sync {
    /// Counts for one composition, zero-valued when no stat row exists.
    async fn stats_for(&self, id: &CompositionId) -> Result<PopularityCounts, DomainError>;

    /// Counts for many compositions. Ids without a stat row are omitted;
    /// callers default them with `counts_for`.
    async fn stats_for_many(
        &self,
        ids: &[CompositionId],
    ) -> Result<HashMap<CompositionId, PopularityCounts>, DomainError>;

    /// Count one view of a composition.
    async fn record_view(&self, id: &CompositionId) -> Result<(), DomainError>;
}
