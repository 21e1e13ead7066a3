//! Database operations for `filtering_stats`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use stockpulse_core::TimePeriod;

use crate::decimal::to_decimal;
use crate::DbError;

/// Funnel counts for one filter run over one stock.
#[derive(Debug, Clone, Copy)]
pub struct NewFilteringStats {
    pub stock_id: i64,
    pub job_run_id: Option<i64>,
    pub time_period: TimePeriod,
    pub raw_count: usize,
    pub after_source_filter: usize,
    pub after_dedup: usize,
    pub after_quality_filter: usize,
    pub final_count: usize,
    /// Percentage removed, two decimals.
    pub filter_rate: f64,
    pub avg_similarity: f64,
    pub high_importance_count: usize,
}

/// A row from the `filtering_stats` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FilteringStatsRow {
    pub id: i64,
    pub stock_id: i64,
    pub job_run_id: Option<i64>,
    pub time_period: String,
    pub raw_count: i32,
    pub after_source_filter: i32,
    pub after_dedup: i32,
    pub after_quality_filter: i32,
    pub final_count: i32,
    pub filter_rate: Decimal,
    pub avg_similarity: Decimal,
    pub high_importance_count: i32,
    pub created_at: DateTime<Utc>,
}

fn count(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Appends one stats row and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_filtering_stats(pool: &PgPool, stats: &NewFilteringStats) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO filtering_stats \
             (stock_id, job_run_id, time_period, raw_count, after_source_filter, after_dedup, \
              after_quality_filter, final_count, filter_rate, avg_similarity, high_importance_count) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id",
    )
    .bind(stats.stock_id)
    .bind(stats.job_run_id)
    .bind(stats.time_period.as_str())
    .bind(count(stats.raw_count))
    .bind(count(stats.after_source_filter))
    .bind(count(stats.after_dedup))
    .bind(count(stats.after_quality_filter))
    .bind(count(stats.final_count))
    .bind(to_decimal(stats.filter_rate, 2))
    .bind(to_decimal(stats.avg_similarity, 3))
    .bind(count(stats.high_importance_count))
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// The `limit` most recent stats rows for a stock.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_filtering_stats(
    pool: &PgPool,
    stock_id: i64,
    limit: i64,
) -> Result<Vec<FilteringStatsRow>, DbError> {
    let rows = sqlx::query_as::<_, FilteringStatsRow>(
        "SELECT id, stock_id, job_run_id, time_period, raw_count, after_source_filter, after_dedup, \
                after_quality_filter, final_count, filter_rate, avg_similarity, \
                high_importance_count, created_at \
         FROM filtering_stats \
         WHERE stock_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(stock_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
