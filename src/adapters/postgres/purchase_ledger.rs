//! PostgreSQL implementation of PurchaseLedger.
//!
//! Purchase and discard each run in one transaction that touches both the
//! `purchases` row and the `composition_stats` counter. The counter is moved
//! with `purchases = purchases ± 1` so concurrent buyers never lose an update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::foundation::{
    CompositionId, DomainError, ErrorCode, Price, PurchaseId, Timestamp, UserId,
};
use crate::domain::purchase::Purchase;
use crate::ports::PurchaseLedger;

use super::db_error;

/// Partial unique index allowing one active purchase per (buyer, composition).
const ONE_ACTIVE_PER_BUYER: &str = "purchases_one_active_per_buyer";

const SELECT_PURCHASE: &str = r#"
    SELECT id, buyer_id, composition_id, price_paid_cents, payment_ref,
           purchased_at, is_active, discarded_at
    FROM purchases
"#;

pub struct PostgresPurchaseLedger {
    pool: PgPool,
}

impl PostgresPurchaseLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a purchase.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    buyer_id: String,
    composition_id: Uuid,
    price_paid_cents: i64,
    payment_ref: String,
    purchased_at: DateTime<Utc>,
    is_active: bool,
    discarded_at: Option<DateTime<Utc>>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        Ok(Purchase {
            id: PurchaseId::from_uuid(row.id),
            buyer_id: UserId::new(row.buyer_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid buyer_id: {}", e))
            })?,
            composition_id: CompositionId::from_uuid(row.composition_id),
            price_paid: Price::from_cents(row.price_paid_cents).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid price: {}", e))
            })?,
            payment_ref: row.payment_ref,
            purchased_at: Timestamp::from_datetime(row.purchased_at),
            is_active: row.is_active,
            discarded_at: row.discarded_at.map(Timestamp::from_datetime),
        })
    }
}

fn unavailable(id: &CompositionId) -> DomainError {
    DomainError::new(
        ErrorCode::CompositionUnavailable,
        "Composition is not available for purchase",
    )
    .with_detail("composition_id", id.to_string())
}

#[async_trait]
impl PurchaseLedger for PostgresPurchaseLedger {
    async fn active_composition_ids(
        &self,
        buyer_id: &UserId,
    ) -> Result<HashSet<CompositionId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT composition_id FROM purchases WHERE buyer_id = $1 AND is_active",
        )
        .bind(buyer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load owned compositions"))?;

        Ok(rows
            .into_iter()
            .map(|(id,)| CompositionId::from_uuid(id))
            .collect())
    }

    async fn record_purchase(&self, purchase: &Purchase) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin purchase transaction"))?;

        // FOR SHARE keeps the composition from being unpublished mid-purchase.
        let eligible: Option<(bool,)> = sqlx::query_as(
            "SELECT is_published AND NOT deleted FROM compositions WHERE id = $1 FOR SHARE",
        )
        .bind(purchase.composition_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to check composition"))?;

        if !matches!(eligible, Some((true,))) {
            return Err(unavailable(&purchase.composition_id));
        }

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, buyer_id, composition_id, price_paid_cents, payment_ref,
                purchased_at, is_active, discarded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, TRUE, NULL)
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.buyer_id.as_str())
        .bind(purchase.composition_id.as_uuid())
        .bind(purchase.price_paid.cents())
        .bind(&purchase.payment_ref)
        .bind(purchase.purchased_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(ONE_ACTIVE_PER_BUYER) {
                    return DomainError::new(
                        ErrorCode::AlreadyOwned,
                        "Buyer already owns this composition",
                    )
                    .with_detail("composition_id", purchase.composition_id.to_string());
                }
            }
            DomainError::database(format!("Failed to save purchase: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO composition_stats (composition_id, purchases, updated_at)
            VALUES ($1, 1, $2)
            ON CONFLICT (composition_id) DO UPDATE
                SET purchases = composition_stats.purchases + 1,
                    updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(purchase.composition_id.as_uuid())
        .bind(purchase.purchased_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to increment purchase count"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit purchase"))?;
        Ok(())
    }

    async fn discard(&self, purchase_id: &PurchaseId) -> Result<Purchase, DomainError> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin discard transaction"))?;

        let updated: Option<PurchaseRow> = sqlx::query_as(
            r#"
            UPDATE purchases
            SET is_active = FALSE, discarded_at = $2
            WHERE id = $1 AND is_active
            RETURNING id, buyer_id, composition_id, price_paid_cents, payment_ref,
                      purchased_at, is_active, discarded_at
            "#,
        )
        .bind(purchase_id.as_uuid())
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to discard purchase"))?;

        let row = match updated {
            Some(row) => row,
            None => {
                let exists: Option<(bool,)> =
                    sqlx::query_as("SELECT is_active FROM purchases WHERE id = $1")
                        .bind(purchase_id.as_uuid())
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(db_error("Failed to find purchase"))?;
                let code = match exists {
                    Some(_) => ErrorCode::AlreadyDiscarded,
                    None => ErrorCode::PurchaseNotFound,
                };
                return Err(DomainError::new(code, "Purchase cannot be discarded")
                    .with_detail("purchase_id", purchase_id.to_string()));
            }
        };

        sqlx::query(
            r#"
            UPDATE composition_stats
            SET purchases = GREATEST(purchases - 1, 0), updated_at = $2
            WHERE composition_id = $1
            "#,
        )
        .bind(row.composition_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to decrement purchase count"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit discard"))?;

        Purchase::try_from(row)
    }

    async fn find_by_id(&self, purchase_id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PURCHASE))
            .bind(purchase_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find purchase"))?;

        row.map(Purchase::try_from).transpose()
    }

    async fn list_active_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Purchase>, DomainError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(&format!(
            "{} WHERE buyer_id = $1 AND is_active ORDER BY purchased_at DESC",
            SELECT_PURCHASE
        ))
        .bind(buyer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list purchases"))?;

        rows.into_iter().map(Purchase::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(is_active: bool) -> PurchaseRow {
        PurchaseRow {
            id: Uuid::new_v4(),
            buyer_id: "buyer-9".to_string(),
            composition_id: Uuid::new_v4(),
            price_paid_cents: 899,
            payment_ref: "mock_ref".to_string(),
            purchased_at: Utc::now(),
            is_active,
            discarded_at: if is_active { None } else { Some(Utc::now()) },
        }
    }

    #[test]
    fn active_row_converts() {
        let purchase = Purchase::try_from(row(true)).unwrap();
        assert!(purchase.is_active);
        assert_eq!(purchase.price_paid.cents(), 899);
        assert_eq!(purchase.buyer_id.as_str(), "buyer-9");
    }

    #[test]
    fn discarded_row_keeps_timestamp() {
        let purchase = Purchase::try_from(row(false)).unwrap();
        assert!(!purchase.is_active);
        assert!(purchase.discarded_at.is_some());
    }

    #[test]
    fn unavailable_error_carries_composition_id() {
        let id = CompositionId::new();
        let err = unavailable(&id);
        assert_eq!(err.code, ErrorCode::CompositionUnavailable);
        assert_eq!(err.details.get("composition_id"), Some(&id.to_string()));
    }
}
