//! Scoring stage.
//!
//! `score = preference_weight * 10 + purchases * 2 + views * 0.1`
//!
//! The multipliers are tuning values carried over from the existing
//! marketplace so rankings stay compatible; they live in [`ScoringWeights`]
//! rather than in the formula so deployments can adjust them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::catalog::Composition;
use crate::domain::foundation::{CompositionId, Price, Timestamp};

use super::{counts_for, PopularityCounts, PreferenceWeights};

/// Multipliers applied to each ranking signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_preference")]
    pub preference: f64,
    #[serde(default = "default_purchase")]
    pub purchase: f64,
    #[serde(default = "default_view")]
    pub view: f64,
}

impl ScoringWeights {
    pub fn score(&self, preference_weight: u32, counts: PopularityCounts) -> f64 {
        f64::from(preference_weight) * self.preference
            + counts.purchases as f64 * self.purchase
            + counts.views as f64 * self.view
    }

    /// True when every multiplier is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.preference, self.purchase, self.view]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            preference: default_preference(),
            purchase: default_purchase(),
            view: default_view(),
        }
    }
}

fn default_preference() -> f64 {
    10.0
}

fn default_purchase() -> f64 {
    2.0
}

fn default_view() -> f64 {
    0.1
}

/// A recommended composition with its computed score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredComposition {
    pub composition_id: CompositionId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub composer_name: String,
    pub category_name: Option<String>,
    pub score: f64,
    /// Tie-break key; not part of the response contract.
    #[serde(skip)]
    pub created_at: Timestamp,
}

/// Scores every candidate. Missing preference or popularity data counts as
/// zero; nothing here filters candidates out.
pub fn score_candidates(
    candidates: Vec<Composition>,
    preferences: &PreferenceWeights,
    stats: &HashMap<CompositionId, PopularityCounts>,
    weights: &ScoringWeights,
) -> Vec<ScoredComposition> {
    candidates
        .into_iter()
        .map(|composition| {
            let preference_weight = preferences.weight_for(composition.category_id);
            let counts = counts_for(stats, &composition.id);

            ScoredComposition {
                composition_id: composition.id,
                title: composition.title,
                description: composition.description,
                price: composition.price,
                composer_name: composition.composer_name,
                category_name: composition.category_name,
                score: weights.score(preference_weight, counts),
                created_at: composition.created_at,
            }
        })
        .collect()
}
