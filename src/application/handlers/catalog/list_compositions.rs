//! ListCompositionsHandler - Query handler for browsing the catalog.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Composition, CompositionFilter};
use crate::domain::foundation::CompositionId;
use crate::domain::recommendation::{counts_for, PopularityCounts};
use crate::ports::{CompositionCatalog, PopularityStats};

/// A listed composition with its current popularity.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub composition: Composition,
    pub counts: PopularityCounts,
}

#[derive(Debug, Clone, Default)]
pub struct ListCompositionsQuery {
    pub filter: CompositionFilter,
}

pub type ListCompositionsResult = Vec<CatalogEntry>;

/// Lists eligible compositions, newest first, joined with their counts.
pub struct ListCompositionsHandler {
    catalog: Arc<dyn CompositionCatalog>,
    stats: Arc<dyn PopularityStats>,
}

impl ListCompositionsHandler {
    pub fn new(catalog: Arc<dyn CompositionCatalog>, stats: Arc<dyn PopularityStats>) -> Self {
        Self { catalog, stats }
    }

    pub async fn handle(
        &self,
        query: ListCompositionsQuery,
    ) -> Result<ListCompositionsResult, CatalogError> {
        let compositions = self
            .catalog
            .list(&query.filter)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;

        let ids: Vec<CompositionId> = compositions.iter().map(|c| c.id).collect();
        let stats = self
            .stats
            .stats_for_many(&ids)
            .await
            .map_err(|e| CatalogError::infrastructure(e.to_string()))?;

        Ok(compositions
            .into_iter()
            .map(|composition| CatalogEntry {
                counts: counts_for(&stats, &composition.id),
                composition,
            })
            .collect())
    }
}
