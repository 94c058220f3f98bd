//! PostgreSQL adapters - Database implementations for marketplace ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCompositionCatalog` - Catalog reads joined with composer and category names
//! - `PostgresPreferenceStore` - Buyer category weights with upsert
//! - `PostgresPopularityStats` - View/purchase counters
//! - `PostgresPurchaseLedger` - Transactional purchase and discard

mod composition_catalog;
mod popularity_stats;
mod preference_store;
mod purchase_ledger;

pub use composition_catalog::PostgresCompositionCatalog;
pub use popularity_stats::PostgresPopularityStats;
pub use preference_store::PostgresPreferenceStore;
pub use purchase_ledger::PostgresPurchaseLedger;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a connection pool sized and timed from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Maps a sqlx failure to a `DatabaseError` prefixed with what was attempted.
fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("{}: {}", context, e))
}

/// Counters are BIGINT with a `>= 0` check; negative reads clamp to zero.
fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn db_error_prefixes_context() {
        let err = db_error("Failed to load stats")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to load stats: "));
    }

    #[test]
    fn non_negative_clamps() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(non_negative(42), 42);
    }
}
