use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("STOCKPULSE_ENV", "development"))?;
    let log_level = or_default("STOCKPULSE_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "STOCKPULSE_SOURCES_PATH",
        "./config/sources.yaml",
    ));

    let openai_api_key = optional("OPENAI_API_KEY");
    let naver_client_id = optional("NAVER_CLIENT_ID");
    let naver_client_secret = optional("NAVER_CLIENT_SECRET");

    let db_max_connections = parse_u32("STOCKPULSE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STOCKPULSE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("STOCKPULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let llm_base_url = or_default("STOCKPULSE_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_timeout_secs = parse_u64("STOCKPULSE_LLM_TIMEOUT_SECS", "60")?;
    let llm_max_retries = parse_u32("STOCKPULSE_LLM_MAX_RETRIES", "2")?;
    let llm_retry_backoff_base_ms = parse_u64("STOCKPULSE_LLM_RETRY_BACKOFF_BASE_MS", "1000")?;

    let news_api_base_url = or_default(
        "STOCKPULSE_NEWS_API_BASE_URL",
        "https://openapi.naver.com",
    );
    let news_page_size = parse_u32("STOCKPULSE_NEWS_PAGE_SIZE", "50")?;
    if !(1..=100).contains(&news_page_size) {
        return Err(invalid(
            "STOCKPULSE_NEWS_PAGE_SIZE",
            format!("{news_page_size} is outside 1..=100"),
        ));
    }
    let fetch_timeout_secs = parse_u64("STOCKPULSE_FETCH_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("STOCKPULSE_USER_AGENT", DEFAULT_USER_AGENT);

    let dedup_threshold = parse_f64("STOCKPULSE_DEDUP_THRESHOLD", "0.8")?;
    if !(0.0..=1.0).contains(&dedup_threshold) {
        return Err(invalid(
            "STOCKPULSE_DEDUP_THRESHOLD",
            format!("{dedup_threshold} is outside [0, 1]"),
        ));
    }

    let sentiment_batch_size = parse_usize("STOCKPULSE_SENTIMENT_BATCH_SIZE", "50")?;
    if sentiment_batch_size == 0 {
        return Err(invalid(
            "STOCKPULSE_SENTIMENT_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let sentiment_batch_delay_ms = parse_u64("STOCKPULSE_SENTIMENT_BATCH_DELAY_MS", "1000")?;
    let enrich_delay_ms = parse_u64("STOCKPULSE_ENRICH_DELAY_MS", "2000")?;
    let max_concurrent_stocks = parse_usize("STOCKPULSE_MAX_CONCURRENT_STOCKS", "1")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        sources_path,
        openai_api_key,
        naver_client_id,
        naver_client_secret,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        llm_base_url,
        llm_timeout_secs,
        llm_max_retries,
        llm_retry_backoff_base_ms,
        news_api_base_url,
        news_page_size,
        fetch_timeout_secs,
        user_agent,
        dedup_threshold,
        sentiment_batch_size,
        sentiment_batch_delay_ms,
        enrich_delay_ms,
        max_concurrent_stocks,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOCKPULSE_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
