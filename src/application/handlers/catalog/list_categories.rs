//! ListCategoriesHandler - Query handler for the category list.
//!
//! Buyers use it to find the ids their preferences are keyed by.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Category};
use crate::ports::CompositionCatalog;

pub struct ListCategoriesHandler {
    catalog: Arc<dyn CompositionCatalog>,
}

impl ListCategoriesHandler {
    pub fn new(catalog: Arc<dyn CompositionCatalog>) -> Self {
        Self { catalog }
    }

    /// All categories, ordered by name.
    pub async fn handle(&self) -> Result<Vec<Category>, CatalogError> {
        self.catalog
            .categories()
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))
    }
}
