//! `enrich`: label importance and fetch full text for the period's quota.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use stockpulse_core::{Importance, NewsItem, TimePeriod};
use stockpulse_db::{EnrichmentUpdate, StockRow};
use stockpulse_filter::{classify_importance, select_for_enrichment, time_period_at};
use stockpulse_llm::{structure_news_content, CompletionClient, StructuredContent};
use stockpulse_news::ArticleFetcher;

use crate::context::AppContext;
use crate::runner::{load_stocks, record_count, run_stage, Stage, Trigger};

/// Candidates read per stock per run.
const CANDIDATE_LIMIT: i64 = 100;

/// Where enrichment results are written.
#[async_trait]
trait EnrichmentStore: Sync {
    async fn set_importance(&self, news_id: i64, importance: Importance) -> anyhow::Result<()>;

    /// Returns whether the row took the content.
    async fn record_enrichment(
        &self,
        news_id: i64,
        importance: Importance,
        content: &EnrichmentUpdate,
    ) -> anyhow::Result<bool>;
}

#[async_trait]
impl EnrichmentStore for PgPool {
    async fn set_importance(&self, news_id: i64, importance: Importance) -> anyhow::Result<()> {
        stockpulse_db::set_importance(self, news_id, importance).await?;
        Ok(())
    }

    async fn record_enrichment(
        &self,
        news_id: i64,
        importance: Importance,
        content: &EnrichmentUpdate,
    ) -> anyhow::Result<bool> {
        Ok(stockpulse_db::record_enrichment(self, news_id, importance, content).await?)
    }
}

/// Tallies for one stock's batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BatchOutcome {
    target: usize,
    enriched: usize,
    failed: usize,
}

struct Enricher<'a> {
    store: &'a dyn EnrichmentStore,
    client: &'a dyn CompletionClient,
    fetcher: &'a ArticleFetcher,
    delay: Duration,
}

fn to_update(content: StructuredContent) -> EnrichmentUpdate {
    EnrichmentUpdate {
        summary: content.summary,
        financial_numbers: content.financial_numbers,
        key_facts: content.key_facts,
        future_outlook: content.future_outlook,
    }
}

impl Enricher<'_> {
    /// Fetch and structure one article. Returns whether content was stored.
    async fn enrich_item(&self, item: &NewsItem, importance: Importance) -> anyhow::Result<bool> {
        let Some(url) = item.url.as_deref() else {
            return Ok(false);
        };
        let article = self.fetcher.fetch_article(url).await?;
        let title = if article.title.is_empty() {
            item.title.as_str()
        } else {
            article.title.as_str()
        };
        let content = structure_news_content(self.client, title, &article.content).await?;
        self.store
            .record_enrichment(item.id, importance, &to_update(content))
            .await
    }

    /// Classify every item, enrich the period's quota and label the rest.
    ///
    /// A failed fetch or structuring step leaves that item with only its
    /// importance label and moves on.
    async fn enrich_batch(
        &self,
        stock_code: &str,
        items: Vec<NewsItem>,
        period: TimePeriod,
    ) -> anyhow::Result<BatchOutcome> {
        let labelled: Vec<(NewsItem, Importance)> = items
            .into_iter()
            .map(|item| {
                let importance = classify_importance(&item.title, item.description.as_deref());
                (item, importance)
            })
            .collect();

        let selection = select_for_enrichment(&labelled, period);
        let selected_ids: HashSet<i64> = selection.selected.iter().map(|item| item.id).collect();

        let mut outcome = BatchOutcome {
            target: selection.target,
            ..BatchOutcome::default()
        };
        let mut pace = false;
        for (item, importance) in &labelled {
            if !selected_ids.contains(&item.id) {
                self.store.set_importance(item.id, *importance).await?;
                continue;
            }

            // Pause only after a successful enrichment.
            if pace {
                tokio::time::sleep(self.delay).await;
            }
            pace = false;

            match self.enrich_item(item, *importance).await {
                Ok(true) => {
                    outcome.enriched += 1;
                    pace = true;
                }
                Ok(false) => {
                    self.store.set_importance(item.id, *importance).await?;
                }
                Err(e) => {
                    tracing::warn!(stock = %stock_code, news_id = item.id, error = %e, "enrichment failed");
                    outcome.failed += 1;
                    self.store.set_importance(item.id, *importance).await?;
                }
            }
        }
        Ok(outcome)
    }
}

async fn enrich_stock(pool: &PgPool, enricher: &Enricher<'_>, stock: &StockRow) -> anyhow::Result<i32> {
    let rows = stockpulse_db::list_enrichment_candidates(pool, stock.id, CANDIDATE_LIMIT).await?;
    if rows.is_empty() {
        return Ok(0);
    }

    let candidates = rows.len();
    let items = rows.into_iter().map(stockpulse_db::NewsArticleRow::into_news_item).collect();
    let period = time_period_at(Utc::now());
    let outcome = enricher.enrich_batch(&stock.code, items, period).await?;

    tracing::info!(
        stock = %stock.code,
        candidates,
        target = outcome.target,
        enriched = outcome.enriched,
        failed = outcome.failed,
        period = period.as_str(),
        "enriched news"
    );
    Ok(record_count(outcome.enriched))
}

/// # Errors
///
/// Returns an error if the stock filter resolves to nothing, the completion
/// key is missing, or the job run cannot be recorded.
pub(crate) async fn run_enrich(
    ctx: &AppContext,
    trigger: Trigger,
    stock_filter: Option<&str>,
) -> anyhow::Result<()> {
    let stocks = load_stocks(&ctx.pool, stock_filter).await?;
    if stocks.is_empty() {
        println!("no active stocks found for enrichment; skipping run creation");
        return Ok(());
    }

    let client = ctx.completion_client()?;
    let fetcher = ArticleFetcher::new(ctx.config.fetch_timeout_secs, &ctx.config.user_agent)?;
    let enricher = Enricher {
        store: &ctx.pool,
        client: client.as_ref(),
        fetcher: &fetcher,
        delay: Duration::from_millis(ctx.config.enrich_delay_ms),
    };

    let totals = run_stage(
        &ctx.pool,
        Stage::Enrich,
        trigger,
        &stocks,
        ctx.config.max_concurrent_stocks,
        |_run_id, stock| enrich_stock(&ctx.pool, &enricher, stock),
    )
    .await?;

    println!(
        "enrich: {} articles enriched across {} stocks ({} failed)",
        totals.records,
        stocks.len(),
        totals.failed_stocks
    );
    Ok(())
}
