//! Offline tests for stockpulse-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::path::PathBuf;

use chrono::Utc;
use rust_decimal::Decimal;
use stockpulse_core::{AppConfig, Environment, Impact, Sentiment};
use stockpulse_db::{AnalyzedNewsRow, JobRunRow, NewsArticleRow, PoolConfig};
use uuid::Uuid;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        sources_path: PathBuf::from("./config/sources.yaml"),
        openai_api_key: None,
        naver_client_id: None,
        naver_client_secret: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        llm_base_url: "https://api.openai.com/v1".to_string(),
        llm_timeout_secs: 60,
        llm_max_retries: 2,
        llm_retry_backoff_base_ms: 1000,
        news_api_base_url: "https://openapi.naver.com".to_string(),
        news_page_size: 50,
        fetch_timeout_secs: 10,
        user_agent: "ua".to_string(),
        dedup_threshold: 0.8,
        sentiment_batch_size: 50,
        sentiment_batch_delay_ms: 1000,
        enrich_delay_ms: 2000,
        max_concurrent_stocks: 1,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn job_run_row_has_expected_fields() {
    let row = JobRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        run_type: "filter".to_string(),
        trigger_source: "scheduler".to_string(),
        status: "queued".to_string(),
        started_at: None,
        completed_at: None,
        records_processed: 0_i32,
        error_message: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.run_type, "filter");
    assert_eq!(row.trigger_source, "scheduler");
    assert!(row.started_at.is_none());
}

#[test]
fn article_row_becomes_news_item_with_url() {
    let collected_at = Utc::now();
    let row = NewsArticleRow {
        id: 7,
        stock_id: 3,
        title: "삼성전자 실적".to_string(),
        description: None,
        source: Some("한국경제".to_string()),
        url: "https://www.hankyung.com/a/1".to_string(),
        published_at: None,
        collected_at,
    };

    let item = row.into_news_item();
    assert_eq!(item.id, 7);
    assert_eq!(item.stock_id, 3);
    assert_eq!(item.url.as_deref(), Some("https://www.hankyung.com/a/1"));
    assert_eq!(item.collected_at, collected_at);
}

#[test]
fn analyzed_row_labels_parse() {
    let row = AnalyzedNewsRow {
        title: "수주".to_string(),
        sentiment: "positive".to_string(),
        sentiment_score: Decimal::new(750, 3),
        impact: "high".to_string(),
        published_at: None,
    };
    assert_eq!(row.sentiment().unwrap(), Sentiment::Positive);
    assert_eq!(row.impact().unwrap(), Impact::High);
    assert!((row.score() - 0.75).abs() < 1e-9);

    let broken = AnalyzedNewsRow {
        sentiment: "bullish".to_string(),
        ..row
    };
    assert!(broken.sentiment().is_err());
}
