//! Recommendation tuning

use serde::Deserialize;

use crate::domain::recommendation::{RecommendationLimit, ScoringWeights};

use super::error::ValidationError;

/// Limits and scoring multipliers for the "For You" feed.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Limit used when the caller does not pass one
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Multipliers for preference weight, purchases and views
    #[serde(default)]
    pub weights: ScoringWeights,
}

impl RecommendationConfig {
    /// The default limit as a validated value.
    pub fn default_limit(&self) -> RecommendationLimit {
        RecommendationLimit::new(i64::from(self.default_limit)).unwrap_or_default()
    }

    /// Validate recommendation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_limit == 0 {
            return Err(ValidationError::InvalidDefaultLimit);
        }
        if !self.weights.is_valid() {
            return Err(ValidationError::InvalidScoringWeights);
        }
        Ok(())
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            weights: ScoringWeights::default(),
        }
    }
}

fn default_limit() -> u32 {
    RecommendationLimit::DEFAULT.get()
}
