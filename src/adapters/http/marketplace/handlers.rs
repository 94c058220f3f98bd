//! HTTP handlers for marketplace endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    DiscardPurchaseCommand, DiscardPurchaseHandler, GetComposerStatsHandler,
    GetComposerStatsQuery, GetRecommendationsHandler, GetRecommendationsQuery,
    ListCategoriesHandler, ListCompositionsHandler, ListCompositionsQuery, ListPurchasesHandler, ListPurchasesQuery,
    PurchaseCompositionCommand, PurchaseCompositionHandler, RecommendationSettings,
    UpdatePreferenceCommand, UpdatePreferenceHandler, ViewCompositionHandler,
    ViewCompositionQuery,
};
use crate::domain::catalog::CompositionFilter;
use crate::domain::foundation::{CategoryId, CompositionId, PurchaseId, UserId};
use crate::ports::{CompositionCatalog, PopularityStats, PreferenceStore, PurchaseLedger};

use crate::adapters::http::auth::AuthenticatedUser;
use crate::adapters::http::error::ApiError;
use super::dto::{
    CategoryListResponse, CategoryResponse, ComposerStatsResponse, CompositionListParams, CompositionListResponse, CompositionResponse,
    PreferenceResponse, PurchaseListResponse, PurchaseRequest, PurchaseResponse,
    RecommendationItem, RecommendationParams, RecommendationsResponse, UpdatePreferenceRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all port implementations.
///
/// Cloned per request; every field is an `Arc`.
#[derive(Clone)]
pub struct MarketplaceAppState {
    pub catalog: Arc<dyn CompositionCatalog>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub stats: Arc<dyn PopularityStats>,
    pub ledger: Arc<dyn PurchaseLedger>,
    pub settings: RecommendationSettings,
}

impl MarketplaceAppState {
    /// State backed by one store that implements every port.
    pub fn from_store<S>(store: Arc<S>, settings: RecommendationSettings) -> Self
    where
        S: CompositionCatalog + PreferenceStore + PopularityStats + PurchaseLedger + 'static,
    {
        Self {
            catalog: store.clone(),
            preferences: store.clone(),
            stats: store.clone(),
            ledger: store,
            settings,
        }
    }

    pub fn recommendations_handler(&self) -> GetRecommendationsHandler {
        GetRecommendationsHandler::new(
            self.catalog.clone(),
            self.preferences.clone(),
            self.stats.clone(),
            self.ledger.clone(),
            self.settings,
        )
    }

    pub fn update_preference_handler(&self) -> UpdatePreferenceHandler {
        UpdatePreferenceHandler::new(self.preferences.clone())
    }

    pub fn list_categories_handler(&self) -> ListCategoriesHandler {
        ListCategoriesHandler::new(self.catalog.clone())
    }

    pub fn list_compositions_handler(&self) -> ListCompositionsHandler {
        ListCompositionsHandler::new(self.catalog.clone(), self.stats.clone())
    }

    pub fn view_composition_handler(&self) -> ViewCompositionHandler {
        ViewCompositionHandler::new(self.catalog.clone(), self.stats.clone())
    }

    pub fn composer_stats_handler(&self) -> GetComposerStatsHandler {
        GetComposerStatsHandler::new(self.catalog.clone(), self.stats.clone())
    }

    pub fn purchase_handler(&self) -> PurchaseCompositionHandler {
        PurchaseCompositionHandler::new(self.catalog.clone(), self.ledger.clone())
    }

    pub fn discard_handler(&self) -> DiscardPurchaseHandler {
        DiscardPurchaseHandler::new(self.ledger.clone())
    }

    pub fn list_purchases_handler(&self) -> ListPurchasesHandler {
        ListPurchasesHandler::new(self.ledger.clone())
    }
}

fn parse<T: FromStr>(field: &str, raw: &str) -> Result<T, ApiError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ApiError::invalid_argument(field, e))
}

// ════════════════════════════════════════════════════════════════════════════════
// Recommendations & Preferences
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/recommendations?limit=N
pub async fn get_recommendations(
    State(state): State<MarketplaceAppState>,
    user: AuthenticatedUser,
    Query(params): Query<RecommendationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params
        .limit
        .as_deref()
        .map(|raw| parse::<i64>("limit", raw))
        .transpose()?;

    let query = GetRecommendationsQuery {
        buyer_id: user.user_id,
        limit,
    };
    let result = state.recommendations_handler().handle(query).await?;

    Ok(Json(RecommendationsResponse {
        recommendations: result.into_iter().map(RecommendationItem::from).collect(),
    }))
}

/// PUT /api/preferences/:category_id
pub async fn update_preference(
    State(state): State<MarketplaceAppState>,
    user: AuthenticatedUser,
    Path(category_id): Path<String>,
    request: Result<Json<UpdatePreferenceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let category_id = CategoryId::new(parse::<i32>("category_id", &category_id)?);
    let cmd = UpdatePreferenceCommand {
        buyer_id: user.user_id,
        category_id,
        weight: request.weight,
    };

    let weight = state.update_preference_handler().handle(cmd).await?;

    Ok(Json(PreferenceResponse {
        category_id: category_id.value(),
        weight,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/categories
pub async fn list_categories(
    State(state): State<MarketplaceAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.list_categories_handler().handle().await?;
    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    }))
}

/// GET /api/compositions?category=&search=
pub async fn list_compositions(
    State(state): State<MarketplaceAppState>,
    Query(params): Query<CompositionListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let category = params
        .category
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse::<i32>("category", raw).map(CategoryId::new))
        .transpose()?;

    let query = ListCompositionsQuery {
        filter: CompositionFilter {
            category,
            search: params.search,
        },
    };
    let entries = state.list_compositions_handler().handle(query).await?;

    Ok(Json(CompositionListResponse {
        compositions: entries.into_iter().map(CompositionResponse::from).collect(),
    }))
}

/// GET /api/compositions/:id - counts as a view
pub async fn view_composition(
    State(state): State<MarketplaceAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ViewCompositionQuery {
        composition_id: parse::<CompositionId>("composition_id", &id)?,
    };
    let entry = state.view_composition_handler().handle(query).await?;
    Ok(Json(CompositionResponse::from(entry)))
}

/// GET /api/composers/:id/stats
pub async fn get_composer_stats(
    State(state): State<MarketplaceAppState>,
    Path(composer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let composer_id =
        UserId::new(composer_id).map_err(|e| ApiError::invalid_argument("composer_id", e))?;
    let stats = state
        .composer_stats_handler()
        .handle(GetComposerStatsQuery { composer_id })
        .await?;
    Ok(Json(ComposerStatsResponse::from(stats)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Purchases
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/purchases
pub async fn purchase_composition(
    State(state): State<MarketplaceAppState>,
    user: AuthenticatedUser,
    request: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let cmd = PurchaseCompositionCommand {
        buyer_id: user.user_id,
        composition_id: parse::<CompositionId>("composition_id", &request.composition_id)?,
        payment_ref: request.payment_ref,
    };

    let purchase = state.purchase_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(purchase))))
}

/// POST /api/purchases/:id/discard
pub async fn discard_purchase(
    State(state): State<MarketplaceAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = DiscardPurchaseCommand {
        buyer_id: user.user_id,
        purchase_id: parse::<PurchaseId>("purchase_id", &id)?,
    };

    let purchase = state.discard_handler().handle(cmd).await?;
    Ok(Json(PurchaseResponse::from(purchase)))
}

/// GET /api/purchases
pub async fn list_purchases(
    State(state): State<MarketplaceAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let purchases = state
        .list_purchases_handler()
        .handle(ListPurchasesQuery {
            buyer_id: user.user_id,
        })
        .await?;

    Ok(Json(PurchaseListResponse {
        purchases: purchases.into_iter().map(PurchaseResponse::from).collect(),
    }))
}
