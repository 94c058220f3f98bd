//! Axum router configuration for marketplace endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    discard_purchase, get_composer_stats, get_recommendations, list_categories, list_compositions,
    list_purchases,
    purchase_composition, update_preference, view_composition, MarketplaceAppState,
};

/// Create the marketplace API router, to be nested under `/api`.
///
/// # Routes
///
/// ## Buyer Endpoints (require `X-User-Id`)
/// - `GET /recommendations` - Personalized "For You" list
/// - `PUT /preferences/:category_id` - Set a category weight
/// - `GET /purchases` - Active purchases
/// - `POST /purchases` - Purchase a composition
/// - `POST /purchases/:id/discard` - Discard a purchase
///
/// ## Public Endpoints
/// - `GET /categories` - Categories by name
/// - `GET /compositions` - Browse the catalog
/// - `GET /compositions/:id` - Composition detail (records a view)
/// - `GET /composers/:id/stats` - Composer dashboard totals
pub fn marketplace_routes() -> Router<MarketplaceAppState> {
    Router::new()
        .route("/recommendations", get(get_recommendations))
        .route("/preferences/:category_id", put(update_preference))
        .route("/categories", get(list_categories))
        .route("/compositions", get(list_compositions))
        .route("/compositions/:id", get(view_composition))
        .route("/purchases", get(list_purchases).post(purchase_composition))
        .route("/purchases/:id/discard", post(discard_purchase))
        .route("/composers/:id/stats", get(get_composer_stats))
}
