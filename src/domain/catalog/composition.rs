//! Composition entity.
//!
//! A composition is a choral work a composer offers for sale. Compositions are
//! never physically removed once a purchase references them; moderation and
//! composer edits toggle the publication and deletion flags instead.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CategoryId, CompositionId, Price, Timestamp, UserId};

/// A composition as read from the catalog, joined with its composer's
/// display name and its category name.
///
/// # Invariants
///
/// - Only `is_published && !deleted` compositions are eligible for listing
///   or recommendation.
/// - A soft-deleted composition is never published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub id: CompositionId,
    pub title: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub price: Price,
    pub composer_id: UserId,
    pub composer_name: String,
    pub duration_seconds: Option<u32>,
    pub is_published: bool,
    pub deleted: bool,
    pub created_at: Timestamp,
}

impl Composition {
    /// Creates a published composition.
    pub fn publish(
        id: CompositionId,
        title: impl Into<String>,
        composer_id: UserId,
        composer_name: impl Into<String>,
        price: Price,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category_id: None,
            category_name: None,
            price,
            composer_id,
            composer_name: composer_name.into(),
            duration_seconds: None,
            is_published: true,
            deleted: false,
            created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, id: CategoryId, name: impl Into<String>) -> Self {
        self.category_id = Some(id);
        self.category_name = Some(name.into());
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Whether this composition may be listed, viewed, bought or recommended.
    pub fn is_eligible(&self) -> bool {
        self.is_published && !self.deleted
    }

    /// Withdraws the composition from sale without deleting it.
    pub fn unpublish(&mut self) {
        self.is_published = false;
    }

    /// Soft-deletes the composition. Deletion also unpublishes.
    pub fn soft_delete(&mut self) {
        self.deleted = true;
        self.is_published = false;
    }
}
