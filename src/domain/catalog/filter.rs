//! Catalog browsing filter.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CategoryId;

use super::Composition;

/// Optional narrowing of a catalog listing.
///
/// Search is a case-insensitive substring match over title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionFilter {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
}

impl CompositionFilter {
    pub fn by_category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
            search: None,
        }
    }

    pub fn by_search(term: impl Into<String>) -> Self {
        Self {
            category: None,
            search: Some(term.into()),
        }
    }

    /// Search term with surrounding whitespace removed, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Whether a composition passes this filter. Eligibility is checked
    /// separately by the catalog.
    pub fn matches(&self, composition: &Composition) -> bool {
        if let Some(category) = self.category {
            if composition.category_id != Some(category) {
                return false;
            }
        }

        match self.search_term() {
            Some(term) => {
                let needle = term.to_lowercase();
                composition.title.to_lowercase().contains(&needle)
                    || composition.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}
