//! `filter`: annotate unfiltered articles and record funnel stats.

use chrono::Utc;
use stockpulse_core::{NewsItem, TimePeriod};
use stockpulse_db::{FilterUpdate, NewFilteringStats, NewsArticleRow, StockRow};
use stockpulse_filter::{run_filter_pipeline, time_period_at, FilterAnnotation, FilteringStats};

use crate::context::AppContext;
use crate::runner::{load_stocks, record_count, run_stage, Stage, Trigger};

/// Rows read per stock per run.
const UNFILTERED_LIMIT: i64 = 1000;

fn to_update(annotation: &FilterAnnotation) -> FilterUpdate {
    FilterUpdate {
        news_id: annotation.news_id,
        filter_score: annotation.filter_score,
        source_tier: annotation.source_tier,
        passed: annotation.passed,
    }
}

fn to_stats_row(
    stock_id: i64,
    job_run_id: i64,
    stats: &FilteringStats,
    period: TimePeriod,
) -> NewFilteringStats {
    NewFilteringStats {
        stock_id,
        job_run_id: Some(job_run_id),
        time_period: period,
        raw_count: stats.raw_count,
        after_source_filter: stats.after_source_filter,
        after_dedup: stats.after_dedup,
        after_quality_filter: stats.after_quality_filter,
        final_count: stats.final_count,
        filter_rate: stats.filter_rate,
        avg_similarity: stats.avg_similarity,
        high_importance_count: stats.high_importance_count,
    }
}

async fn filter_stock(ctx: &AppContext, job_run_id: i64, stock: &StockRow) -> anyhow::Result<i32> {
    let rows = stockpulse_db::list_unfiltered_news(&ctx.pool, stock.id, UNFILTERED_LIMIT).await?;
    if rows.is_empty() {
        tracing::debug!(stock = %stock.code, "no unfiltered news");
        return Ok(0);
    }

    let items: Vec<NewsItem> = rows.into_iter().map(NewsArticleRow::into_news_item).collect();
    let report = run_filter_pipeline(&items, &ctx.catalog, ctx.config.dedup_threshold);

    let updates: Vec<FilterUpdate> = report.annotations.iter().map(to_update).collect();
    let updated = stockpulse_db::record_filter_annotations(&ctx.pool, &updates).await?;

    let period = time_period_at(Utc::now());
    let stats = to_stats_row(stock.id, job_run_id, &report.stats, period);
    stockpulse_db::insert_filtering_stats(&ctx.pool, &stats).await?;

    tracing::info!(
        stock = %stock.code,
        raw = report.stats.raw_count,
        passed = report.stats.final_count,
        filter_rate = report.stats.filter_rate,
        period = period.as_str(),
        "filtered news"
    );
    Ok(record_count(usize::try_from(updated).unwrap_or(usize::MAX)))
}

/// # Errors
///
/// Returns an error if the stock filter resolves to nothing or the job run
/// cannot be recorded.
pub(crate) async fn run_filter(
    ctx: &AppContext,
    trigger: Trigger,
    stock_filter: Option<&str>,
) -> anyhow::Result<()> {
    let stocks = load_stocks(&ctx.pool, stock_filter).await?;
    if stocks.is_empty() {
        println!("no active stocks found for filtering; skipping run creation");
        return Ok(());
    }

    let totals = run_stage(
        &ctx.pool,
        Stage::Filter,
        trigger,
        &stocks,
        ctx.config.max_concurrent_stocks,
        |run_id, stock| filter_stock(ctx, run_id, stock),
    )
    .await?;

    println!(
        "filter: {} articles annotated across {} stocks ({} failed)",
        totals.records,
        stocks.len(),
        totals.failed_stocks
    );
    Ok(())
}
