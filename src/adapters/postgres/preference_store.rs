//! PostgreSQL implementation of PreferenceStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::unknown_category;
use crate::domain::foundation::{CategoryId, DomainError, UserId};
use crate::domain::recommendation::PreferenceWeights;
use crate::ports::PreferenceStore;

use super::db_error;

pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `weight` is an INTEGER column.
fn weight_column(weight: u32) -> Result<i32, DomainError> {
    i32::try_from(weight).map_err(|_| {
        DomainError::validation("weight", format!("Weight {} is too large", weight))
    })
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    async fn weights_for(&self, buyer_id: &UserId) -> Result<PreferenceWeights, DomainError> {
        let rows: Vec<(i32, i32)> = sqlx::query_as(
            "SELECT category_id, weight FROM buyer_preferences WHERE buyer_id = $1",
        )
        .bind(buyer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load buyer preferences"))?;

        Ok(rows
            .into_iter()
            .map(|(category, weight)| {
                (CategoryId::new(category), u32::try_from(weight).unwrap_or(0))
            })
            .collect())
    }

    async fn upsert(
        &self,
        buyer_id: &UserId,
        category_id: CategoryId,
        weight: u32,
    ) -> Result<(), DomainError> {
        let weight = weight_column(weight)?;

        sqlx::query(
            r#"
            INSERT INTO buyer_preferences (buyer_id, category_id, weight)
            VALUES ($1, $2, $3)
            ON CONFLICT (buyer_id, category_id) DO UPDATE SET weight = EXCLUDED.weight
            "#,
        )
        .bind(buyer_id.as_str())
        .bind(category_id.value())
        .bind(weight)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // buyer_preferences.category_id references categories(id)
                if db_err.is_foreign_key_violation() {
                    return unknown_category(category_id);
                }
            }
            DomainError::database(format!("Failed to upsert buyer preference: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn weight_column_accepts_i32_range() {
        assert_eq!(weight_column(0).unwrap(), 0);
        assert_eq!(weight_column(i32::MAX as u32).unwrap(), i32::MAX);
    }

    #[test]
    fn oversized_weight_is_a_validation_error() {
        let err = weight_column(u32::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"weight".to_string()));
    }
}
