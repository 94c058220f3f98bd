//! Popularity counters.
//!
//! Each composition owns exactly one stat row, created zeroed alongside the
//! composition. The purchase counter moves only inside the purchase and
//! discard transactions; the recommender reads it and never writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{CompositionId, Timestamp};

/// View and purchase counts for one composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityCounts {
    pub views: u64,
    pub purchases: u64,
}

impl PopularityCounts {
    pub fn new(views: u64, purchases: u64) -> Self {
        Self { views, purchases }
    }
}

/// Counts for `id`, zero when no stat row exists yet.
pub fn counts_for(
    stats: &HashMap<CompositionId, PopularityCounts>,
    id: &CompositionId,
) -> PopularityCounts {
    stats.get(id).copied().unwrap_or_default()
}

/// Stat row owned by a composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityStat {
    pub composition_id: CompositionId,
    pub counts: PopularityCounts,
    pub updated_at: Timestamp,
}

impl PopularityStat {
    /// Zeroed stat row for a newly created composition.
    pub fn zeroed(composition_id: CompositionId, at: Timestamp) -> Self {
        Self {
            composition_id,
            counts: PopularityCounts::default(),
            updated_at: at,
        }
    }

    pub fn record_view(&mut self, at: Timestamp) {
        self.counts.views = self.counts.views.saturating_add(1);
        self.updated_at = at;
    }

    pub fn record_purchase(&mut self, at: Timestamp) {
        self.counts.purchases = self.counts.purchases.saturating_add(1);
        self.updated_at = at;
    }

    /// Decrements the purchase counter, never below zero.
    pub fn record_discard(&mut self, at: Timestamp) {
        self.counts.purchases = self.counts.purchases.saturating_sub(1);
        self.updated_at = at;
    }
}
