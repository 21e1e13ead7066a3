//! Database operations for `news_articles`.
//!
//! Rows are inserted once by the collector and never rewritten; each later
//! stage fills its own annotation columns, guarded so a second pass over the
//! same row is a no-op.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use stockpulse_core::{Impact, Importance, NewsItem, Sentiment, SourceTier, UnknownVariant};

use crate::decimal::{to_decimal, to_f64};
use crate::DbError;

/// Version tag written alongside each sentiment annotation.
pub const ANALYSIS_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Row and parameter types
// ---------------------------------------------------------------------------

/// The collected columns of a `news_articles` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsArticleRow {
    pub id: i64,
    pub stock_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub collected_at: DateTime<Utc>,
}

impl NewsArticleRow {
    #[must_use]
    pub fn into_news_item(self) -> NewsItem {
        NewsItem {
            id: self.id,
            stock_id: self.stock_id,
            title: self.title,
            description: self.description,
            source: self.source,
            url: Some(self.url),
            published_at: self.published_at,
            collected_at: self.collected_at,
        }
    }
}

/// A sentiment-annotated headline, as the news agent reads it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalyzedNewsRow {
    pub title: String,
    pub sentiment: String,
    pub sentiment_score: Decimal,
    pub impact: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl AnalyzedNewsRow {
    /// # Errors
    ///
    /// Returns [`DbError::InvalidColumn`] if the stored label is unknown.
    pub fn sentiment(&self) -> Result<Sentiment, DbError> {
        self.sentiment.parse().map_err(|e: UnknownVariant| {
            DbError::InvalidColumn {
                column: "sentiment",
                reason: e.to_string(),
            }
        })
    }

    /// # Errors
    ///
    /// Returns [`DbError::InvalidColumn`] if the stored label is unknown.
    pub fn impact(&self) -> Result<Impact, DbError> {
        self.impact.parse().map_err(|e: UnknownVariant| {
            DbError::InvalidColumn {
                column: "impact",
                reason: e.to_string(),
            }
        })
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        to_f64(self.sentiment_score)
    }
}

/// A freshly collected article.
#[derive(Debug, Clone)]
pub struct NewNewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// The filter stage's verdict for one row.
#[derive(Debug, Clone, Copy)]
pub struct FilterUpdate {
    pub news_id: i64,
    /// In `[0, 1]`; stored with three decimals.
    pub filter_score: f64,
    pub source_tier: SourceTier,
    pub passed: bool,
}

/// Structured full-text content for one enriched row.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentUpdate {
    pub summary: String,
    pub financial_numbers: Vec<String>,
    pub key_facts: Vec<String>,
    pub future_outlook: Option<String>,
}

/// Sentiment judgment for one row.
#[derive(Debug, Clone)]
pub struct SentimentUpdate {
    pub sentiment: Sentiment,
    /// In `[-1, 1]`; stored with three decimals.
    pub score: f64,
    pub impact: Impact,
    pub key_topics: Vec<String>,
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Inserts an article unless `(stock_id, url)` already exists.
///
/// Returns `true` if a row was inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_news_article_if_new(
    pool: &PgPool,
    stock_id: i64,
    article: &NewNewsArticle,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO news_articles (stock_id, title, description, source, url, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (stock_id, url) DO NOTHING",
    )
    .bind(stock_id)
    .bind(&article.title)
    .bind(&article.description)
    .bind(&article.source)
    .bind(&article.url)
    .bind(article.published_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows the filter stage has not annotated yet, newest collected first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unfiltered_news(
    pool: &PgPool,
    stock_id: i64,
    limit: i64,
) -> Result<Vec<NewsArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, NewsArticleRow>(
        "SELECT id, stock_id, title, description, source, url, published_at, collected_at \
         FROM news_articles \
         WHERE stock_id = $1 AND filter_score IS NULL \
         ORDER BY collected_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(stock_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Writes filter annotations in one transaction.
///
/// Rows that already carry a score are left untouched. Returns the number
/// of rows updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any update fails; the whole batch is rolled
/// back.
pub async fn record_filter_annotations(
    pool: &PgPool,
    updates: &[FilterUpdate],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut updated = 0u64;

    for update in updates {
        let result = sqlx::query(
            "UPDATE news_articles \
             SET filter_score = $1, source_tier = $2, passed_filter = $3 \
             WHERE id = $4 AND filter_score IS NULL",
        )
        .bind(to_decimal(update.filter_score, 3))
        .bind(update.source_tier.as_str())
        .bind(update.passed)
        .bind(update.news_id)
        .execute(&mut *tx)
        .await?;
        updated += result.rows_affected();
    }

    tx.commit().await?;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Filter-passed rows without an importance label, most recently collected first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_enrichment_candidates(
    pool: &PgPool,
    stock_id: i64,
    limit: i64,
) -> Result<Vec<NewsArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, NewsArticleRow>(
        "SELECT id, stock_id, title, description, source, url, published_at, collected_at \
         FROM news_articles \
         WHERE stock_id = $1 AND passed_filter = true \
           AND importance IS NULL AND has_full_content = false \
         ORDER BY collected_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(stock_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Labels a row's importance without enriching it.
///
/// Returns `false` if the row was already labelled.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_importance(pool: &PgPool, id: i64, importance: Importance) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE news_articles SET importance = $1 \
         WHERE id = $2 AND importance IS NULL",
    )
    .bind(importance.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Stores structured full-text content and the importance label together.
///
/// Returns `false` if the row already had full content.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn record_enrichment(
    pool: &PgPool,
    id: i64,
    importance: Importance,
    content: &EnrichmentUpdate,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE news_articles \
         SET importance = $1, has_full_content = true, full_content_summary = $2, \
             financial_numbers = $3, key_facts = $4, future_outlook = $5 \
         WHERE id = $6 AND has_full_content = false",
    )
    .bind(importance.as_str())
    .bind(&content.summary)
    .bind(&content.financial_numbers)
    .bind(&content.key_facts)
    .bind(&content.future_outlook)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Filter-passed rows awaiting sentiment analysis, newest published first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unanalyzed_news(
    pool: &PgPool,
    stock_id: i64,
    limit: i64,
) -> Result<Vec<NewsArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, NewsArticleRow>(
        "SELECT id, stock_id, title, description, source, url, published_at, collected_at \
         FROM news_articles \
         WHERE stock_id = $1 AND passed_filter = true AND analyzed = false \
         ORDER BY published_at DESC NULLS LAST, id DESC \
         LIMIT $2",
    )
    .bind(stock_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Stores a sentiment judgment and marks the row analyzed.
///
/// Returns `false` if the row was already analyzed; re-analysis never
/// overwrites an earlier judgment.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn record_sentiment(
    pool: &PgPool,
    id: i64,
    update: &SentimentUpdate,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE news_articles \
         SET sentiment = $1, sentiment_score = $2, impact = $3, key_topics = $4, \
             analyzed = true, analysis_version = $5 \
         WHERE id = $6 AND analyzed = false",
    )
    .bind(update.sentiment.as_str())
    .bind(to_decimal(update.score.clamp(-1.0, 1.0), 3))
    .bind(update.impact.as_str())
    .bind(&update.key_topics)
    .bind(ANALYSIS_VERSION)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// The `limit` most recent analyzed headlines for a stock.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_analyzed(
    pool: &PgPool,
    stock_id: i64,
    limit: i64,
) -> Result<Vec<AnalyzedNewsRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalyzedNewsRow>(
        "SELECT title, sentiment, sentiment_score, impact, published_at \
         FROM news_articles \
         WHERE stock_id = $1 AND analyzed = true \
           AND sentiment IS NOT NULL AND sentiment_score IS NOT NULL AND impact IS NOT NULL \
         ORDER BY published_at DESC NULLS LAST, id DESC \
         LIMIT $2",
    )
    .bind(stock_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
