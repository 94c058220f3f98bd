//! HTTP DTOs (Data Transfer Objects) for marketplace endpoints.
//!
//! These types define the JSON request/response structure of the API and are
//! the boundary between HTTP and the application layer. Money is sent both
//! as integer cents and as a display string.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{CatalogEntry, ComposerStats, CompositionStats};
use crate::domain::catalog::Category;
use crate::domain::purchase::Purchase;
use crate::domain::recommendation::ScoredComposition;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /api/recommendations?limit=N`. Parsed by the handler so a bad value
/// gets the same error body as a non-positive one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<String>,
}

/// `PUT /api/preferences/:category_id`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePreferenceRequest {
    pub weight: i64,
}

/// `GET /api/compositions?category=&search=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompositionListParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// `POST /api/purchases`
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub composition_id: String,
    pub payment_ref: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub composition_id: String,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub price: String,
    pub composer_name: String,
    pub category_name: Option<String>,
    pub score: f64,
}

impl From<ScoredComposition> for RecommendationItem {
    fn from(scored: ScoredComposition) -> Self {
        Self {
            composition_id: scored.composition_id.to_string(),
            title: scored.title,
            description: scored.description,
            price_cents: scored.price.cents(),
            price: scored.price.to_string(),
            composer_name: scored.composer_name,
            category_name: scored.category_name,
            score: scored.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub category_id: i32,
    pub weight: u32,
}

/// A composition with its popularity counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub price_cents: i64,
    pub price: String,
    pub composer_id: String,
    pub composer_name: String,
    pub duration_seconds: Option<u32>,
    /// ISO 8601
    pub created_at: String,
    pub views: u64,
    pub purchases: u64,
}

impl From<CatalogEntry> for CompositionResponse {
    fn from(entry: CatalogEntry) -> Self {
        let c = entry.composition;
        Self {
            id: c.id.to_string(),
            title: c.title,
            description: c.description,
            category_id: c.category_id.map(|id| id.value()),
            category_name: c.category_name,
            price_cents: c.price.cents(),
            price: c.price.to_string(),
            composer_id: c.composer_id.to_string(),
            composer_name: c.composer_name,
            duration_seconds: c.duration_seconds,
            created_at: c.created_at.as_datetime().to_rfc3339(),
            views: entry.counts.views,
            purchases: entry.counts.purchases,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionListResponse {
    pub compositions: Vec<CompositionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.value(),
            name: category.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub id: String,
    pub composition_id: String,
    pub price_paid_cents: i64,
    pub payment_ref: String,
    pub purchased_at: String,
    pub is_active: bool,
    pub discarded_at: Option<String>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(p: Purchase) -> Self {
        Self {
            id: p.id.to_string(),
            composition_id: p.composition_id.to_string(),
            price_paid_cents: p.price_paid.cents(),
            payment_ref: p.payment_ref,
            purchased_at: p.purchased_at.as_datetime().to_rfc3339(),
            is_active: p.is_active,
            discarded_at: p.discarded_at.map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseListResponse {
    pub purchases: Vec<PurchaseResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionStatsResponse {
    pub composition_id: String,
    pub title: String,
    pub is_published: bool,
    pub price_cents: i64,
    pub views: u64,
    pub purchases: u64,
    pub revenue_cents: i64,
}

impl From<CompositionStats> for CompositionStatsResponse {
    fn from(s: CompositionStats) -> Self {
        Self {
            composition_id: s.composition_id.to_string(),
            title: s.title,
            is_published: s.is_published,
            price_cents: s.price.cents(),
            views: s.views,
            purchases: s.purchases,
            revenue_cents: s.revenue.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerStatsResponse {
    pub composer_id: String,
    pub total_compositions: usize,
    pub total_views: u64,
    pub total_purchases: u64,
    pub total_revenue_cents: i64,
    pub total_revenue: String,
    pub compositions: Vec<CompositionStatsResponse>,
}

impl From<ComposerStats> for ComposerStatsResponse {
    fn from(stats: ComposerStats) -> Self {
        Self {
            composer_id: stats.composer_id.to_string(),
            total_compositions: stats.total_compositions,
            total_views: stats.total_views,
            total_purchases: stats.total_purchases,
            total_revenue_cents: stats.total_revenue.cents(),
            total_revenue: stats.total_revenue.to_string(),
            compositions: stats
                .compositions
                .into_iter()
                .map(CompositionStatsResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
