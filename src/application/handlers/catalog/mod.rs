//! Catalog handlers.
//!
//! ## Queries
//! - Listing categories
//! - Browsing the catalog with category and text filters
//! - Viewing one composition (records a view)
//! - Composer dashboard totals

mod get_composer_stats;
mod list_categories;
mod list_compositions;
mod view_composition;

pub use get_composer_stats::{
    ComposerStats, CompositionStats, GetComposerStatsHandler, GetComposerStatsQuery,
};
pub use list_categories::ListCategoriesHandler;
pub use list_compositions::{
    CatalogEntry, ListCompositionsHandler, ListCompositionsQuery, ListCompositionsResult,
};
pub use view_composition::{ViewCompositionHandler, ViewCompositionQuery};
