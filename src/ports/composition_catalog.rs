//! Composition catalog port (read side).
//!
//! # Example
//!
//! ```ignore
//! async fn unseen(
//!     catalog: &dyn CompositionCatalog,
//!     owned: &HashSet<CompositionId>,
//! ) -> Result<usize, DomainError> {
//!     Ok(catalog.eligible_compositions(owned).await?.len())
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::catalog::{Category, Composition, CompositionFilter};
use crate::domain::foundation::{CompositionId, DomainError, UserId};

/// Reader port for the composition catalog.
///
/// Every composition returned carries its composer display name and category
/// name already joined in.
#[async_trait]
pub trait CompositionCatalog: Send + Sync {
    /// All eligible (published, not deleted) compositions whose id is not in
    /// `excluding`. Order is unspecified.
    async fn eligible_compositions(
        &self,
        excluding: &HashSet<CompositionId>,
    ) -> Result<Vec<Composition>, DomainError>;

    /// Eligible compositions matching `filter`, newest first.
    async fn list(&self, filter: &CompositionFilter) -> Result<Vec<Composition>, DomainError>;

    /// A composition in any state, `None` when it does not exist.
    async fn find_by_id(&self, id: &CompositionId) -> Result<Option<Composition>, DomainError>;

    /// A composer's non-deleted compositions (published or not), newest first.
    async fn list_by_composer(&self, composer_id: &UserId)
        -> Result<Vec<Composition>, DomainError>;

    /// Every category, ordered by name.
    async fn categories(&self) -> Result<Vec<Category>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn composition_catalog_is_object_safe() {
        fn _accepts_dyn(_catalog: &dyn CompositionCatalog) {}
    }
}
