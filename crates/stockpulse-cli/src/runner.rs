//! Shared orchestration for per-stock stage runs.
//!
//! Every stage follows the same skeleton: create a job run, process each
//! stock with bounded concurrency, log per-stock failures, and fail the run
//! only when every stock failed.

use std::future::Future;

use futures::stream::{self, StreamExt};
use stockpulse_db::StockRow;

use crate::fail_run_best_effort;

/// Who started a run, recorded on the job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Cli,
    Scheduler,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Cli => "cli",
            Trigger::Scheduler => "scheduler",
        }
    }
}

/// Pipeline stage, recorded as the job row's `run_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Collect,
    Filter,
    Enrich,
    Sentiment,
    Analyze,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Collect => "collect",
            Stage::Filter => "filter",
            Stage::Enrich => "enrich",
            Stage::Sentiment => "sentiment",
            Stage::Analyze => "analyze",
        }
    }
}

/// Load the stocks a stage should process.
///
/// With `stock_filter` set, returns that single stock or an error if it is
/// unknown or inactive; otherwise every active stock.
pub(crate) async fn load_stocks(
    pool: &sqlx::PgPool,
    stock_filter: Option<&str>,
) -> anyhow::Result<Vec<StockRow>> {
    if let Some(code) = stock_filter {
        let stock = stockpulse_db::get_stock_by_code(pool, code)
            .await?
            .ok_or_else(|| anyhow::anyhow!("stock '{code}' not found or inactive"))?;
        Ok(vec![stock])
    } else {
        Ok(stockpulse_db::list_active_stocks(pool).await?)
    }
}

/// Per-stage tallies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StageTotals {
    pub records: i32,
    pub failed_stocks: usize,
}

/// Fold per-stock results into totals.
pub(crate) fn tally<'s>(
    stage: Stage,
    results: impl IntoIterator<Item = (&'s StockRow, anyhow::Result<i32>)>,
) -> StageTotals {
    let mut totals = StageTotals::default();
    for (stock, result) in results {
        match result {
            Ok(records) => totals.records = totals.records.saturating_add(records),
            Err(e) => {
                tracing::error!(
                    stock = %stock.code,
                    error = %e,
                    "{} failed for stock",
                    stage.as_str()
                );
                totals.failed_stocks += 1;
            }
        }
    }
    totals
}

/// Run `process` for every stock under one job run.
///
/// `process` receives the job run id and the stock and returns the number of
/// records it handled.
///
/// # Errors
///
/// Returns an error if the run cannot be created or started, if every stock
/// failed, or if the run cannot be marked complete.
pub(crate) async fn run_stage<'a, F, Fut>(
    pool: &sqlx::PgPool,
    stage: Stage,
    trigger: Trigger,
    stocks: &'a [StockRow],
    max_concurrent: usize,
    process: F,
) -> anyhow::Result<StageTotals>
where
    F: Fn(i64, &'a StockRow) -> Fut,
    Fut: Future<Output = anyhow::Result<i32>>,
{
    let run = stockpulse_db::create_job_run(pool, stage.as_str(), trigger.as_str()).await?;
    if let Err(e) = stockpulse_db::start_job_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, stage.as_str(), format!("{e:#}")).await;
        return Err(e.into());
    }

    let pending: Vec<_> = stocks
        .iter()
        .map(|stock: &'a StockRow| {
            let fut = process(run.id, stock);
            async move { (stock, fut.await) }
        })
        .collect();
    let results: Vec<(&StockRow, anyhow::Result<i32>)> = stream::iter(pending)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let totals = tally(stage, results);
    let stock_count = stocks.len();

    if totals.failed_stocks > 0 {
        tracing::warn!(
            failed_stocks = totals.failed_stocks,
            total_stocks = stock_count,
            stage = stage.as_str(),
            "some stocks failed"
        );
    }

    if stock_count > 0 && totals.failed_stocks == stock_count {
        let message = format!("all {stock_count} stocks failed {}", stage.as_str());
        fail_run_best_effort(pool, run.id, stage.as_str(), message.clone()).await;
        anyhow::bail!("{message}");
    }

    if let Err(err) = stockpulse_db::complete_job_run(pool, run.id, totals.records).await {
        fail_run_best_effort(pool, run.id, stage.as_str(), format!("{err:#}")).await;
        return Err(err.into());
    }

    tracing::info!(
        stage = stage.as_str(),
        trigger = trigger.as_str(),
        records = totals.records,
        stocks = stock_count,
        "stage complete"
    );
    Ok(totals)
}

/// Convert a count to the `records_processed` column type.
pub(crate) fn record_count(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
