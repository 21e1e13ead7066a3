//! `sentiment`: score filtered articles that have not been analyzed.

use std::time::Duration;

use stockpulse_core::NewsItem;
use stockpulse_db::{NewsArticleRow, SentimentUpdate, StockRow};
use stockpulse_llm::CompletionClient;
use stockpulse_sentiment::{batch_analyze_sentiment, SentimentConfig, SentimentResult};

use crate::context::AppContext;
use crate::runner::{load_stocks, record_count, run_stage, Stage, Trigger};

/// Rows read per stock per run.
const UNANALYZED_LIMIT: i64 = 500;

fn to_update(result: SentimentResult) -> SentimentUpdate {
    SentimentUpdate {
        sentiment: result.sentiment,
        score: result.score,
        impact: result.impact,
        key_topics: result.key_topics,
    }
}

async fn analyze_stock(
    ctx: &AppContext,
    client: &dyn CompletionClient,
    config: &SentimentConfig,
    stock: &StockRow,
) -> anyhow::Result<i32> {
    let rows = stockpulse_db::list_unanalyzed_news(&ctx.pool, stock.id, UNANALYZED_LIMIT).await?;
    if rows.is_empty() {
        return Ok(0);
    }

    let items: Vec<NewsItem> = rows.into_iter().map(NewsArticleRow::into_news_item).collect();
    let results = batch_analyze_sentiment(client, &items, config).await;

    let mut stored = 0usize;
    for (item, result) in items.iter().zip(results) {
        if stockpulse_db::record_sentiment(&ctx.pool, item.id, &to_update(result)).await? {
            stored += 1;
        }
    }

    tracing::info!(stock = %stock.code, items = items.len(), stored, "scored sentiment");
    Ok(record_count(stored))
}

/// # Errors
///
/// Returns an error if the stock filter resolves to nothing, the completion
/// key is missing, or the job run cannot be recorded.
pub(crate) async fn run_sentiment(
    ctx: &AppContext,
    trigger: Trigger,
    stock_filter: Option<&str>,
) -> anyhow::Result<()> {
    let stocks = load_stocks(&ctx.pool, stock_filter).await?;
    if stocks.is_empty() {
        println!("no active stocks found for sentiment analysis; skipping run creation");
        return Ok(());
    }

    let client = ctx.completion_client()?;
    let config = SentimentConfig {
        batch_size: ctx.config.sentiment_batch_size,
        batch_delay: Duration::from_millis(ctx.config.sentiment_batch_delay_ms),
    };

    let totals = run_stage(
        &ctx.pool,
        Stage::Sentiment,
        trigger,
        &stocks,
        ctx.config.max_concurrent_stocks,
        |_run_id, stock| analyze_stock(ctx, client.as_ref(), &config, stock),
    )
    .await?;

    println!(
        "sentiment: {} articles scored across {} stocks ({} failed)",
        totals.records,
        stocks.len(),
        totals.failed_stocks
    );
    Ok(())
}
