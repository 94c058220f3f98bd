//! PostgreSQL implementation of PopularityStats.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::foundation::{CompositionId, DomainError};
use crate::domain::recommendation::PopularityCounts;
use crate::ports::PopularityStats;

use super::{db_error, non_negative};

pub struct PostgresPopularityStats {
    pool: PgPool,
}

impl PostgresPopularityStats {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PopularityStats for PostgresPopularityStats {
    async fn stats_for(&self, id: &CompositionId) -> Result<PopularityCounts, DomainError> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT views, purchases FROM composition_stats WHERE composition_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load composition stats"))?;

        Ok(row
            .map(|(views, purchases)| {
                PopularityCounts::new(non_negative(views), non_negative(purchases))
            })
            .unwrap_or_default())
    }

    async fn stats_for_many(
        &self,
        ids: &[CompositionId],
    ) -> Result<HashMap<CompositionId, PopularityCounts>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<(Uuid, i64, i64)> = sqlx::query_as(
            r#"
            SELECT composition_id, views, purchases
            FROM composition_stats
            WHERE composition_id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load composition stats"))?;

        Ok(rows
            .into_iter()
            .map(|(id, views, purchases)| {
                (
                    CompositionId::from_uuid(id),
                    PopularityCounts::new(non_negative(views), non_negative(purchases)),
                )
            })
            .collect())
    }

    async fn record_view(&self, id: &CompositionId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO composition_stats (composition_id, views, updated_at)
            VALUES ($1, 1, NOW())
            ON CONFLICT (composition_id) DO UPDATE
                SET views = composition_stats.views + 1,
                    updated_at = NOW()
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record view"))?;

        Ok(())
    }
}
