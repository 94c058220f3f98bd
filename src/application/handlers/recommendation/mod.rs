//! Recommendation handlers.
//!
//! ## Queries
//! - Ranked "For You" recommendations for a buyer
//!
//! ## Commands
//! - Setting a buyer's category preference weight

mod get_recommendations;
mod update_preference;

pub use get_recommendations::{
    GetRecommendationsHandler, GetRecommendationsQuery, GetRecommendationsResult,
    RecommendationSettings,
};
pub use update_preference::{UpdatePreferenceCommand, UpdatePreferenceHandler, MAX_PREFERENCE_WEIGHT};
