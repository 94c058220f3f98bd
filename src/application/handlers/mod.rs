//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod catalog;
pub mod purchase;
pub mod recommendation;

pub use catalog::{
    CatalogEntry, ComposerStats, CompositionStats, GetComposerStatsHandler,
    GetComposerStatsQuery, ListCategoriesHandler, ListCompositionsHandler, ListCompositionsQuery,
    ListCompositionsResult, ViewCompositionHandler, ViewCompositionQuery,
};
pub use purchase::{
    DiscardPurchaseCommand, DiscardPurchaseHandler, ListPurchasesHandler, ListPurchasesQuery,
    ListPurchasesResult, PurchaseCompositionCommand, PurchaseCompositionHandler,
};
pub use recommendation::{
    GetRecommendationsHandler, GetRecommendationsQuery, GetRecommendationsResult,
    RecommendationSettings, UpdatePreferenceCommand, UpdatePreferenceHandler,
    MAX_PREFERENCE_WEIGHT,
};
