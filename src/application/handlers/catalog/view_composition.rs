//! ViewCompositionHandler - Query handler for a composition's detail page.
//!
//! Opening the detail page is what counts as a view, so this query records
//! one before returning the composition.

use std::sync::Arc;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::CompositionId;
use crate::ports::{CompositionCatalog, PopularityStats};

use super::CatalogEntry;

#[derive(Debug, Clone)]
pub struct ViewCompositionQuery {
    pub composition_id: CompositionId,
}

pub struct ViewCompositionHandler {
    catalog: Arc<dyn CompositionCatalog>,
    stats: Arc<dyn PopularityStats>,
}

impl ViewCompositionHandler {
    pub fn new(catalog: Arc<dyn CompositionCatalog>, stats: Arc<dyn PopularityStats>) -> Self {
        Self { catalog, stats }
    }

    pub async fn handle(&self, query: ViewCompositionQuery) -> Result<CatalogEntry, CatalogError> {
        let composition = self
            .catalog
            .find_by_id(&query.composition_id)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?
            .filter(|c| c.is_eligible())
            .ok_or(CatalogError::not_found(query.composition_id))?;

        self.stats
            .record_view(&composition.id)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;

        let counts = self
            .stats
            .stats_for(&composition.id)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;

        tracing::debug!(composition_id = %composition.id, views = counts.views, "composition viewed");
        Ok(CatalogEntry {
            composition,
            counts,
        })
    }
}
