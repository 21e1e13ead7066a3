//! Long-lived handles shared by every stage of a CLI or scheduler process.

use std::sync::Arc;

use sqlx::PgPool;
use stockpulse_agents::TtlCache;
use stockpulse_core::{AppConfig, SourceCatalog};
use stockpulse_llm::{CompletionClient, OpenAiClient};

pub(crate) struct AppContext {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub catalog: SourceCatalog,
    /// Market data cache; outlives individual analysis runs under the scheduler.
    pub cache: Arc<TtlCache>,
}

impl AppContext {
    /// # Errors
    ///
    /// Returns an error if the source catalog cannot be loaded.
    pub fn new(pool: PgPool, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let catalog = stockpulse_core::load_sources(&config.sources_path)?;
        Ok(Self {
            pool,
            config,
            catalog,
            cache: Arc::new(TtlCache::with_system_clock()),
        })
    }

    /// Build the completion client for a model-using stage.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is unset or the HTTP client
    /// cannot be built.
    pub fn completion_client(&self) -> anyhow::Result<Arc<dyn CompletionClient>> {
        let api_key = self.config.require_openai_api_key()?;
        let client = OpenAiClient::new(
            &self.config.llm_base_url,
            api_key,
            self.config.llm_timeout_secs,
            self.config.llm_max_retries,
            self.config.llm_retry_backoff_base_ms,
        )?;
        Ok(Arc::new(client))
    }
}
