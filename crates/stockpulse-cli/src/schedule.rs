//! Cron-driven pipeline.
//!
//! Cron expressions are six-field (with seconds) and evaluated in UTC; the
//! analysis slots are Korean market times shifted by nine hours.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::context::AppContext;
use crate::runner::Trigger;

/// Collect then filter, every 30 minutes.
const COLLECT_CRON: &str = "0 */30 * * * *";

/// Enrich then score sentiment, hourly, after the top-of-hour collect.
const ENRICH_CRON: &str = "0 10 * * * *";

/// One analysis slot: the KST wall-clock time and its UTC cron expression.
#[derive(Debug, Clone, Copy)]
struct AnalysisSlot {
    kst_hour: u32,
    kst_minute: u32,
    cron: &'static str,
}

/// 08:30 KST (pre-open), 12:00 KST (midday), 15:40 KST (after close), on
/// Korean weekdays. 08:30 KST falls on the previous UTC day.
const ANALYSIS_SLOTS: [AnalysisSlot; 3] = [
    AnalysisSlot {
        kst_hour: 8,
        kst_minute: 30,
        cron: "0 30 23 * * SUN,MON,TUE,WED,THU",
    },
    AnalysisSlot {
        kst_hour: 12,
        kst_minute: 0,
        cron: "0 0 3 * * MON-FRI",
    },
    AnalysisSlot {
        kst_hour: 15,
        kst_minute: 40,
        cron: "0 40 6 * * MON-FRI",
    },
];

/// Serializes runs of one pipeline; a tick that finds the previous run still
/// going is skipped.
type RunGuard = Arc<Mutex<()>>;

async fn collect_and_filter(ctx: &AppContext) {
    if let Err(e) = crate::collect::run_collect(ctx, Trigger::Scheduler, None, false).await {
        tracing::error!(error = %e, "scheduler: collect failed");
    }
    if let Err(e) = crate::filter::run_filter(ctx, Trigger::Scheduler, None).await {
        tracing::error!(error = %e, "scheduler: filter failed");
    }
}

async fn enrich_and_score(ctx: &AppContext) {
    if let Err(e) = crate::enrich::run_enrich(ctx, Trigger::Scheduler, None).await {
        tracing::error!(error = %e, "scheduler: enrich failed");
    }
    if let Err(e) = crate::sentiment::run_sentiment(ctx, Trigger::Scheduler, None).await {
        tracing::error!(error = %e, "scheduler: sentiment failed");
    }
}

async fn analyze(ctx: &AppContext) {
    if let Err(e) = crate::analyze::run_analyze(ctx, Trigger::Scheduler, None).await {
        tracing::error!(error = %e, "scheduler: analyze failed");
    }
}

#[derive(Debug, Clone, Copy)]
enum Pipeline {
    CollectFilter,
    EnrichSentiment,
    Analyze,
}

impl Pipeline {
    fn name(self) -> &'static str {
        match self {
            Pipeline::CollectFilter => "collect+filter",
            Pipeline::EnrichSentiment => "enrich+sentiment",
            Pipeline::Analyze => "analyze",
        }
    }

    async fn run(self, ctx: &AppContext) {
        match self {
            Pipeline::CollectFilter => collect_and_filter(ctx).await,
            Pipeline::EnrichSentiment => enrich_and_score(ctx).await,
            Pipeline::Analyze => analyze(ctx).await,
        }
    }
}

async fn register(
    scheduler: &JobScheduler,
    cron: &'static str,
    pipeline: Pipeline,
    ctx: Arc<AppContext>,
    guard: RunGuard,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let ctx = Arc::clone(&ctx);
        let guard = Arc::clone(&guard);

        Box::pin(async move {
            let Ok(_running) = guard.try_lock() else {
                tracing::warn!(pipeline = pipeline.name(), "scheduler: previous run still active; skipping tick");
                return;
            };
            tracing::info!(pipeline = pipeline.name(), "scheduler: starting run");
            pipeline.run(&ctx).await;
            tracing::info!(pipeline = pipeline.name(), "scheduler: run complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Build and start the scheduler with every recurring job registered.
///
/// The returned handle must be kept alive; dropping it stops all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, a
/// job cannot be registered, or the scheduler fails to start.
pub(crate) async fn build_scheduler(ctx: Arc<AppContext>) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register(
        &scheduler,
        COLLECT_CRON,
        Pipeline::CollectFilter,
        Arc::clone(&ctx),
        RunGuard::default(),
    )
    .await?;
    register(
        &scheduler,
        ENRICH_CRON,
        Pipeline::EnrichSentiment,
        Arc::clone(&ctx),
        RunGuard::default(),
    )
    .await?;

    let analyze_guard = RunGuard::default();
    for slot in ANALYSIS_SLOTS {
        register(
            &scheduler,
            slot.cron,
            Pipeline::Analyze,
            Arc::clone(&ctx),
            Arc::clone(&analyze_guard),
        )
        .await?;
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Run the scheduler until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the scheduler cannot start or shut down cleanly.
pub(crate) async fn run_scheduler(ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let mut scheduler = build_scheduler(ctx).await?;
    tracing::info!(
        collect = COLLECT_CRON,
        enrich = ENRICH_CRON,
        analysis_slots = ANALYSIS_SLOTS.len(),
        "scheduler started"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested; stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
