//! PostgreSQL implementation of CompositionCatalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::catalog::{Category, Composition, CompositionFilter};
use crate::domain::foundation::{
    CategoryId, CompositionId, DomainError, ErrorCode, Price, Timestamp, UserId,
};
use crate::ports::CompositionCatalog;

use super::db_error;

/// Columns shared by every catalog query. Composer and category names are
/// joined in so callers never issue follow-up lookups.
const SELECT_COMPOSITION: &str = r#"
    SELECT c.id, c.title, c.description, c.category_id, cat.name AS category_name,
           c.price_cents, c.composer_id, COALESCE(u.display_name, '') AS composer_name,
           c.duration_seconds, c.is_published, c.deleted, c.created_at
    FROM compositions c
    LEFT JOIN users u ON u.id = c.composer_id
    LEFT JOIN categories cat ON cat.id = c.category_id
"#;

/// PostgreSQL implementation of the CompositionCatalog port.
pub struct PostgresCompositionCatalog {
    pool: PgPool,
}

impl PostgresCompositionCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a composition.
#[derive(Debug, sqlx::FromRow)]
struct CompositionRow {
    id: Uuid,
    title: String,
    description: String,
    category_id: Option<i32>,
    category_name: Option<String>,
    price_cents: i64,
    composer_id: String,
    composer_name: String,
    duration_seconds: Option<i32>,
    is_published: bool,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CompositionRow> for Composition {
    type Error = DomainError;

    fn try_from(row: CompositionRow) -> Result<Self, Self::Error> {
        let price = Price::from_cents(row.price_cents).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid price: {}", e))
        })?;
        let composer_id = UserId::new(row.composer_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid composer_id: {}", e))
        })?;

        Ok(Composition {
            id: CompositionId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            category_id: row.category_id.map(CategoryId::new),
            category_name: row.category_name,
            price,
            composer_id,
            composer_name: row.composer_name,
            duration_seconds: row.duration_seconds.and_then(|s| u32::try_from(s).ok()),
            is_published: row.is_published,
            deleted: row.deleted,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn into_compositions(rows: Vec<CompositionRow>) -> Result<Vec<Composition>, DomainError> {
    rows.into_iter().map(Composition::try_from).collect()
}

/// Escapes LIKE metacharacters so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CompositionCatalog for PostgresCompositionCatalog {
    async fn eligible_compositions(
        &self,
        excluding: &HashSet<CompositionId>,
    ) -> Result<Vec<Composition>, DomainError> {
        let excluded: Vec<Uuid> = excluding.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<CompositionRow> = sqlx::query_as(&format!(
            "{} WHERE c.is_published AND NOT c.deleted AND NOT (c.id = ANY($1))",
            SELECT_COMPOSITION
        ))
        .bind(&excluded)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch eligible compositions"))?;

        into_compositions(rows)
    }

    async fn list(&self, filter: &CompositionFilter) -> Result<Vec<Composition>, DomainError> {
        let rows: Vec<CompositionRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE c.is_published AND NOT c.deleted
              AND ($1::INTEGER IS NULL OR c.category_id = $1)
              AND ($2::TEXT IS NULL OR c.title ILIKE $2 OR c.description ILIKE $2)
            ORDER BY c.created_at DESC, c.id ASC
            "#,
            SELECT_COMPOSITION
        ))
        .bind(filter.category.map(|c| c.value()))
        .bind(filter.search_term().map(like_pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list compositions"))?;

        into_compositions(rows)
    }

    async fn find_by_id(&self, id: &CompositionId) -> Result<Option<Composition>, DomainError> {
        let row: Option<CompositionRow> =
            sqlx::query_as(&format!("{} WHERE c.id = $1", SELECT_COMPOSITION))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find composition"))?;

        row.map(Composition::try_from).transpose()
    }

    async fn list_by_composer(
        &self,
        composer_id: &UserId,
    ) -> Result<Vec<Composition>, DomainError> {
        let rows: Vec<CompositionRow> = sqlx::query_as(&format!(
            "{} WHERE c.composer_id = $1 AND NOT c.deleted ORDER BY c.created_at DESC, c.id ASC",
            SELECT_COMPOSITION
        ))
        .bind(composer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list composer compositions"))?;

        into_compositions(rows)
    }

    async fn categories(&self) -> Result<Vec<Category>, DomainError> {
        let rows: Vec<(i32, String)> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY name, id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list categories"))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category::new(CategoryId::new(id), name))
            .collect())
    }
}
