use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub sources_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_retry_backoff_base_ms: u64,
    pub news_api_base_url: String,
    pub news_page_size: u32,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub dedup_threshold: f64,
    pub sentiment_batch_size: usize,
    pub sentiment_batch_delay_ms: u64,
    pub enrich_delay_ms: u64,
    pub max_concurrent_stocks: usize,
}

impl AppConfig {
    /// The completion-service key, required by every command that calls the model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `OPENAI_API_KEY` was not set.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }

    /// News-search credentials as `(client_id, client_secret)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first absent variable.
    pub fn require_naver_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let id = self
            .naver_client_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("NAVER_CLIENT_ID".to_string()))?;
        let secret = self
            .naver_client_secret
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("NAVER_CLIENT_SECRET".to_string()))?;
        Ok((id, secret))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("database_url", &"[redacted]")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("naver_client_id", &self.naver_client_id)
            .field(
                "naver_client_secret",
                &self.naver_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_retry_backoff_base_ms", &self.llm_retry_backoff_base_ms)
            .field("news_api_base_url", &self.news_api_base_url)
            .field("news_page_size", &self.news_page_size)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("dedup_threshold", &self.dedup_threshold)
            .field("sentiment_batch_size", &self.sentiment_batch_size)
            .field("sentiment_batch_delay_ms", &self.sentiment_batch_delay_ms)
            .field("enrich_delay_ms", &self.enrich_delay_ms)
            .field("max_concurrent_stocks", &self.max_concurrent_stocks)
            .finish()
    }
}
