//! Catalog categories.

use crate::domain::foundation::{CategoryId, DomainError, ErrorCode};

/// A category compositions are filed under and buyers weight preferences by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Error for a reference to a category that does not exist.
pub fn unknown_category(id: CategoryId) -> DomainError {
    DomainError::new(ErrorCode::CategoryNotFound, format!("Unknown category: {}", id))
        .with_detail("category_id", id.to_string())
}

/// Sorts categories by name, then id.
pub fn by_name(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    categories
}
