//! Buyer category preferences.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::CategoryId;

/// A buyer's category → weight mapping.
///
/// Weights are non-negative integers. A category without a recorded weight,
/// and a composition without a category, both weigh zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceWeights(HashMap<CategoryId, u32>);

impl PreferenceWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a weight, replacing any previous value for the category.
    pub fn set(&mut self, category: CategoryId, weight: u32) {
        self.0.insert(category, weight);
    }

    /// Weight for a composition's category, zero when absent.
    pub fn weight_for(&self, category: Option<CategoryId>) -> u32 {
        category
            .and_then(|id| self.0.get(&id).copied())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &u32)> {
        self.0.iter()
    }
}

impl FromIterator<(CategoryId, u32)> for PreferenceWeights {
    fn from_iter<T: IntoIterator<Item = (CategoryId, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
