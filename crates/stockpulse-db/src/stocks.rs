//! Database operations for the `stocks` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `stocks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockRow {
    pub id: i64,
    /// Six-digit exchange code, e.g. `005930`.
    pub code: String,
    pub name: String,
    /// `KOSPI` or `KOSDAQ`.
    pub market: String,
    pub sector: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns all active stocks, ordered by code.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_stocks(pool: &PgPool) -> Result<Vec<StockRow>, DbError> {
    let rows = sqlx::query_as::<_, StockRow>(
        "SELECT id, code, name, market, sector, is_active, created_at, updated_at \
         FROM stocks \
         WHERE is_active = true \
         ORDER BY code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active stock by code, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_stock_by_code(pool: &PgPool, code: &str) -> Result<Option<StockRow>, DbError> {
    let row = sqlx::query_as::<_, StockRow>(
        "SELECT id, code, name, market, sector, is_active, created_at, updated_at \
         FROM stocks \
         WHERE code = $1 AND is_active = true",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
