mod analyze;
mod collect;
mod context;
mod enrich;
mod filter;
mod runner;
mod schedule;
mod sentiment;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;
use crate::runner::Trigger;

#[derive(Debug, Parser)]
#[command(name = "stockpulse")]
#[command(about = "Korean stock news pipeline and multi-agent investment analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Search news for active stocks and store articles not seen before
    Collect {
        /// Restrict collection to one stock (by code)
        #[arg(long)]
        stock: Option<String>,

        /// List the stocks that would be searched without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Annotate unfiltered articles with source tier, score and pass/fail
    Filter {
        /// Restrict filtering to one stock (by code)
        #[arg(long)]
        stock: Option<String>,
    },
    /// Label importance and fetch full text for the period's quota of articles
    Enrich {
        /// Restrict enrichment to one stock (by code)
        #[arg(long)]
        stock: Option<String>,
    },
    /// Score sentiment for filtered articles not yet analyzed
    Sentiment {
        /// Restrict analysis to one stock (by code)
        #[arg(long)]
        stock: Option<String>,
    },
    /// Run the five-agent analysis and store one recommendation per stock
    Analyze {
        /// Restrict analysis to one stock (by code)
        #[arg(long)]
        stock: Option<String>,
    },
    /// Run every stage on its cron schedule until interrupted
    Schedule,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("stockpulse: no command given (see --help)");
        return Ok(());
    };

    let config = Arc::new(stockpulse_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = stockpulse_db::connect_pool_from_config(&config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            stockpulse_db::health_check(&pool).await?;
            println!("database reachable");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = stockpulse_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Collect { stock, dry_run } => {
            let ctx = AppContext::new(pool, config)?;
            collect::run_collect(&ctx, Trigger::Cli, stock.as_deref(), dry_run).await?;
        }
        Commands::Filter { stock } => {
            let ctx = AppContext::new(pool, config)?;
            filter::run_filter(&ctx, Trigger::Cli, stock.as_deref()).await?;
        }
        Commands::Enrich { stock } => {
            let ctx = AppContext::new(pool, config)?;
            enrich::run_enrich(&ctx, Trigger::Cli, stock.as_deref()).await?;
        }
        Commands::Sentiment { stock } => {
            let ctx = AppContext::new(pool, config)?;
            sentiment::run_sentiment(&ctx, Trigger::Cli, stock.as_deref()).await?;
        }
        Commands::Analyze { stock } => {
            let ctx = AppContext::new(pool, config)?;
            analyze::run_analyze(&ctx, Trigger::Cli, stock.as_deref()).await?;
        }
        Commands::Schedule => {
            let ctx = Arc::new(AppContext::new(pool, config)?);
            schedule::run_scheduler(ctx).await?;
        }
    }

    Ok(())
}

/// Mark a job run as failed, logging rather than propagating any error
/// from the status update itself.
async fn fail_run_best_effort(
    pool: &sqlx::PgPool,
    run_id: i64,
    context: &'static str,
    message: String,
) {
    if let Err(mark_err) = stockpulse_db::fail_job_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark {context} run as failed"
        );
    }
}

#[cfg(test)]
mod tests;
