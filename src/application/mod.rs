//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Recommendation
    GetRecommendationsHandler, GetRecommendationsQuery, RecommendationSettings,
    UpdatePreferenceCommand, UpdatePreferenceHandler,
    // Purchase
    DiscardPurchaseCommand, DiscardPurchaseHandler, ListPurchasesHandler, ListPurchasesQuery,
    PurchaseCompositionCommand, PurchaseCompositionHandler,
    // Catalog
    CatalogEntry, ComposerStats, GetComposerStatsHandler, GetComposerStatsQuery,
    ListCompositionsHandler, ListCompositionsQuery, ViewCompositionHandler, ViewCompositionQuery,
};
