use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stockpulse_core::{Impact, Sentiment};

use crate::cache::{CacheCategory, TtlCache};

/// Scope of the single market-wide macro cache entry.
const MACRO_SCOPE: &str = "global";

/// At most this many analyzed news items are handed to the news agent.
const RECENT_NEWS_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Metric sets
// ---------------------------------------------------------------------------

/// Financial statement ratios and totals. `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    /// Percent.
    pub roe: Option<f64>,
    /// Percent.
    pub debt_ratio: Option<f64>,
    pub current_ratio: Option<f64>,
    /// KRW.
    pub revenue: Option<f64>,
    pub operating_profit: Option<f64>,
    pub net_profit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub price: Option<f64>,
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicators {
    pub kospi: Option<f64>,
    pub kosdaq: Option<f64>,
    pub usd_krw: Option<f64>,
    /// Base rate, percent.
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Percent.
    pub volatility: Option<f64>,
    pub beta: Option<f64>,
    /// Percent.
    pub max_drawdown: Option<f64>,
    pub risk_level: RiskLevel,
}

// ---------------------------------------------------------------------------
// News context
// ---------------------------------------------------------------------------

/// A news item that already carries a sentiment judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedNews {
    pub title: String,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub impact: Impact,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTrend {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsContext {
    /// Newest first, at most 20.
    pub recent: Vec<AnalyzedNews>,
    pub trend: SentimentTrend,
}

// ---------------------------------------------------------------------------
// Market data source
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Request(String),

    #[error("market data for {code} could not be parsed: {reason}")]
    Parse { code: String, reason: String },
}

/// Provider of the numeric inputs behind the financial, technical, macro and
/// risk agents.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MarketDataError`] when the provider cannot answer.
    async fn financial(&self, code: &str) -> Result<FinancialMetrics, MarketDataError>;

    /// # Errors
    ///
    /// Returns [`MarketDataError`] when the provider cannot answer.
    async fn technical(&self, code: &str) -> Result<TechnicalIndicators, MarketDataError>;

    /// # Errors
    ///
    /// Returns [`MarketDataError`] when the provider cannot answer.
    async fn macro_indicators(&self) -> Result<MacroIndicators, MarketDataError>;

    /// # Errors
    ///
    /// Returns [`MarketDataError`] when the provider cannot answer.
    async fn risk(&self, code: &str) -> Result<RiskMetrics, MarketDataError>;
}

/// Source with no live feed behind it: every metric is unknown and the risk
/// level is medium.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableMarketData;

#[async_trait]
impl MarketDataSource for UnavailableMarketData {
    async fn financial(&self, _code: &str) -> Result<FinancialMetrics, MarketDataError> {
        Ok(FinancialMetrics::default())
    }

    async fn technical(&self, _code: &str) -> Result<TechnicalIndicators, MarketDataError> {
        Ok(TechnicalIndicators::default())
    }

    async fn macro_indicators(&self) -> Result<MacroIndicators, MarketDataError> {
        Ok(MacroIndicators::default())
    }

    async fn risk(&self, _code: &str) -> Result<RiskMetrics, MarketDataError> {
        Ok(RiskMetrics::default())
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Gathers agent inputs for one analysis run, consulting the shared cache
/// first. Create one per run; [`DataCollector::used_cache`] reports whether
/// any category was served from the cache during that run.
pub struct DataCollector<'a> {
    cache: &'a TtlCache,
    source: &'a dyn MarketDataSource,
    used_cache: AtomicBool,
}

impl<'a> DataCollector<'a> {
    #[must_use]
    pub fn new(cache: &'a TtlCache, source: &'a dyn MarketDataSource) -> Self {
        Self {
            cache,
            source,
            used_cache: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn used_cache(&self) -> bool {
        self.used_cache.load(Ordering::Relaxed)
    }

    /// Cached for 24 hours per stock.
    pub async fn financial(&self, code: &str) -> FinancialMetrics {
        self.cached(CacheCategory::Financial, code, self.source.financial(code))
            .await
    }

    /// Cached for 5 minutes per stock.
    pub async fn technical(&self, code: &str) -> TechnicalIndicators {
        self.cached(CacheCategory::Technical, code, self.source.technical(code))
            .await
    }

    /// Cached for 7 days, shared by every stock.
    pub async fn macro_indicators(&self) -> MacroIndicators {
        self.cached(
            CacheCategory::Macro,
            MACRO_SCOPE,
            self.source.macro_indicators(),
        )
        .await
    }

    /// Never cached.
    pub async fn risk(&self, code: &str) -> RiskMetrics {
        match self.source.risk(code).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(stock = %code, error = %e, "risk data unavailable, using empty metrics");
                RiskMetrics::default()
            }
        }
    }

    /// Never cached: the caller supplies the analyzed items, newest first.
    #[must_use]
    pub fn news(&self, analyzed: &[AnalyzedNews]) -> NewsContext {
        let recent: Vec<AnalyzedNews> = analyzed.iter().take(RECENT_NEWS_LIMIT).cloned().collect();
        let mut trend = SentimentTrend::default();
        for item in &recent {
            match item.sentiment {
                Sentiment::Positive => trend.positive += 1,
                Sentiment::Negative => trend.negative += 1,
                Sentiment::Neutral => trend.neutral += 1,
            }
        }
        NewsContext { recent, trend }
    }

    async fn cached<T, F>(&self, category: CacheCategory, scope: &str, fetch: F) -> T
    where
        T: Serialize + DeserializeOwned + Default,
        F: Future<Output = Result<T, MarketDataError>>,
    {
        let key = category.key(scope);
        if let Some(hit) = self.cache.get::<T>(&key) {
            self.used_cache.store(true, Ordering::Relaxed);
            tracing::debug!(key = %key, "market data served from cache");
            return hit;
        }

        match fetch.await {
            Ok(value) => {
                self.cache.set(&key, &value, category.ttl());
                value
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "market data unavailable, using empty metrics");
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    /// Counts calls; financial lookups fail for code "FAIL".
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataSource for CountingSource {
        async fn financial(&self, code: &str) -> Result<FinancialMetrics, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if code == "FAIL" {
                return Err(MarketDataError::Request("down".to_string()));
            }
            Ok(FinancialMetrics {
                per: Some(12.5),
                ..FinancialMetrics::default()
            })
        }

        async fn technical(&self, _code: &str) -> Result<TechnicalIndicators, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TechnicalIndicators::default())
        }

        async fn macro_indicators(&self) -> Result<MacroIndicators, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MacroIndicators {
                kospi: Some(2_600.0),
                ..MacroIndicators::default()
            })
        }

        async fn risk(&self, _code: &str) -> Result<RiskMetrics, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RiskMetrics::default())
        }
    }

    fn news(sentiment: Sentiment) -> AnalyzedNews {
        AnalyzedNews {
            title: "기사".to_string(),
            sentiment,
            sentiment_score: 0.0,
            impact: Impact::Medium,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn second_run_is_served_from_cache() {
        let cache = TtlCache::with_system_clock();
        let source = CountingSource::default();

        let first = DataCollector::new(&cache, &source);
        let metrics = first.financial("005930").await;
        assert_eq!(metrics.per, Some(12.5));
        assert!(!first.used_cache());

        let second = DataCollector::new(&cache, &source);
        assert_eq!(second.financial("005930").await.per, Some(12.5));
        assert!(second.used_cache());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn macro_entry_is_shared_across_stocks() {
        let cache = TtlCache::with_system_clock();
        let source = CountingSource::default();
        let collector = DataCollector::new(&cache, &source);

        collector.macro_indicators().await;
        let again = collector.macro_indicators().await;
        assert_eq!(again.kospi, Some(2_600.0));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(cache.get::<MacroIndicators>("macro:global").is_some());
    }

    #[tokio::test]
    async fn failures_are_empty_and_not_cached() {
        let cache = TtlCache::with_system_clock();
        let source = CountingSource::default();
        let collector = DataCollector::new(&cache, &source);

        assert_eq!(collector.financial("FAIL").await, FinancialMetrics::default());
        assert!(cache.is_empty());
        collector.financial("FAIL").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(!collector.used_cache());
    }

    #[tokio::test]
    async fn risk_is_never_cached() {
        let cache = TtlCache::with_system_clock();
        let source = CountingSource::default();
        let collector = DataCollector::new(&cache, &source);

        let risk = collector.risk("005930").await;
        collector.risk("005930").await;
        assert_eq!(risk.risk_level, RiskLevel::Medium);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn news_context_counts_trend_over_first_twenty() {
        let cache = TtlCache::with_system_clock();
        let collector = DataCollector::new(&cache, &UnavailableMarketData);

        let mut analyzed = vec![news(Sentiment::Positive); 3];
        analyzed.push(news(Sentiment::Negative));
        analyzed.extend(vec![news(Sentiment::Neutral); 20]);

        let context = collector.news(&analyzed);
        assert_eq!(context.recent.len(), 20);
        assert_eq!(
            context.trend,
            SentimentTrend {
                positive: 3,
                negative: 1,
                neutral: 16
            }
        );
    }
}
