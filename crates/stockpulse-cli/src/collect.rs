//! `collect`: search news for each stock and store unseen articles.

use stockpulse_core::SourceCatalog;
use stockpulse_db::{NewNewsArticle, StockRow};
use stockpulse_news::{normalize_item, CollectedArticle, NaverNewsClient};

use crate::context::AppContext;
use crate::runner::{load_stocks, record_count, run_stage, Stage, Trigger};

const SEARCH_MAX_RETRIES: u32 = 3;
const SEARCH_BACKOFF_BASE_MS: u64 = 1000;

fn to_new_article(article: CollectedArticle) -> NewNewsArticle {
    NewNewsArticle {
        title: article.title,
        description: article.description,
        source: article.source,
        url: article.url,
        published_at: article.published_at,
    }
}

/// Build the search client from the configured credentials.
fn build_news_client(ctx: &AppContext) -> anyhow::Result<NaverNewsClient> {
    let (client_id, client_secret) = ctx.config.require_naver_credentials()?;
    Ok(NaverNewsClient::new(
        &ctx.config.news_api_base_url,
        client_id,
        client_secret,
        ctx.config.fetch_timeout_secs,
        SEARCH_MAX_RETRIES,
        SEARCH_BACKOFF_BASE_MS,
    )?)
}

async fn collect_stock(
    pool: &sqlx::PgPool,
    client: &NaverNewsClient,
    catalog: &SourceCatalog,
    page_size: u32,
    stock: &StockRow,
) -> anyhow::Result<i32> {
    let items = client.search(&stock.name, page_size).await?;
    let found = items.len();

    let mut inserted = 0usize;
    for article in items.into_iter().filter_map(|item| normalize_item(item, catalog)) {
        if stockpulse_db::insert_news_article_if_new(pool, stock.id, &to_new_article(article)).await? {
            inserted += 1;
        }
    }

    tracing::info!(stock = %stock.code, found, inserted, "collected news");
    Ok(record_count(inserted))
}

/// # Errors
///
/// Returns an error if the stock filter resolves to nothing, the search
/// credentials are missing, or the job run cannot be recorded.
pub(crate) async fn run_collect(
    ctx: &AppContext,
    trigger: Trigger,
    stock_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let stocks = load_stocks(&ctx.pool, stock_filter).await?;
    if stocks.is_empty() {
        println!("no active stocks found for collection; skipping run creation");
        return Ok(());
    }

    if dry_run {
        let codes: Vec<&str> = stocks.iter().map(|s| s.code.as_str()).collect();
        println!(
            "dry-run: would collect news for {} stocks: [{}]",
            stocks.len(),
            codes.join(", ")
        );
        return Ok(());
    }

    let client = build_news_client(ctx)?;
    let page_size = ctx.config.news_page_size;

    let totals = run_stage(
        &ctx.pool,
        Stage::Collect,
        trigger,
        &stocks,
        ctx.config.max_concurrent_stocks,
        |_run_id, stock| collect_stock(&ctx.pool, &client, &ctx.catalog, page_size, stock),
    )
    .await?;

    println!(
        "collect: {} new articles across {} stocks ({} failed)",
        totals.records,
        stocks.len(),
        totals.failed_stocks
    );
    Ok(())
}
