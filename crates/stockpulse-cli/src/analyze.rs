//! `analyze`: run the five-agent analysis and store one verdict per stock.

use std::sync::Arc;

use serde::Serialize;
use stockpulse_agents::{
    AgentOpinion, AnalysisEngine, AnalysisInput, AnalysisRecord, AnalyzedNews,
    UnavailableMarketData,
};
use stockpulse_db::{AnalyzedNewsRow, NewInvestmentOpinion, OpinionColumns, StockRow};

use crate::context::AppContext;
use crate::runner::{load_stocks, run_stage, Stage, Trigger};

/// Headlines handed to the news agent.
const RECENT_NEWS_LIMIT: i64 = 20;

fn to_analyzed_news(row: AnalyzedNewsRow) -> Option<AnalyzedNews> {
    match (row.sentiment(), row.impact()) {
        (Ok(sentiment), Ok(impact)) => Some(AnalyzedNews {
            sentiment_score: row.score(),
            title: row.title,
            sentiment,
            impact,
            published_at: row.published_at,
        }),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(title = %row.title, error = %e, "skipping news with unreadable labels");
            None
        }
    }
}

/// JSON copy of a value for the audit column; a serialization failure is
/// logged and stores nothing.
fn snapshot<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, "could not serialize analysis snapshot; storing none");
            None
        }
    }
}

fn columns(opinion: &AgentOpinion) -> OpinionColumns {
    OpinionColumns {
        recommendation: opinion.recommendation,
        confidence: opinion.confidence,
        reasoning: opinion.reasoning.clone(),
    }
}

fn to_new_opinion(stock_id: i64, record: &AnalysisRecord) -> NewInvestmentOpinion {
    let synthesis = &record.synthesis;
    NewInvestmentOpinion {
        stock_id,
        fundamental: columns(&record.opinions.fundamental),
        technical: columns(&record.opinions.technical),
        news: columns(&record.opinions.news),
        macroeconomic: columns(&record.opinions.macroeconomic),
        risk: columns(&record.opinions.risk),
        had_debate: record.debate.had_debate,
        debate_summary: record.debate.debate_summary.clone(),
        consensus_level: record.debate.consensus_level,
        changed_agents: record.debate.changed_agents.clone(),
        final_recommendation: synthesis.final_recommendation,
        final_confidence: synthesis.final_confidence,
        target_price: synthesis.target_price,
        stop_loss: synthesis.stop_loss,
        time_horizon: synthesis.time_horizon.clone(),
        strategy: synthesis.strategy.clone(),
        key_reasons: synthesis.key_reasons.clone(),
        risks: synthesis.risks.clone(),
        analysis_type: record.analysis_type.to_string(),
        synthesis_model: synthesis.model.as_str().to_string(),
        generation_time_ms: record.generation_time_ms,
        used_cache: record.used_cache,
        snapshot: snapshot(record),
    }
}

async fn analyze_stock(
    ctx: &AppContext,
    engine: &AnalysisEngine,
    stock: &StockRow,
) -> anyhow::Result<i32> {
    let rows = stockpulse_db::list_recent_analyzed(&ctx.pool, stock.id, RECENT_NEWS_LIMIT).await?;
    let input = AnalysisInput {
        stock_code: stock.code.clone(),
        stock_name: stock.name.clone(),
        recent_news: rows.into_iter().filter_map(to_analyzed_news).collect(),
    };

    let record = engine.run(&input, rand::random::<f64>()).await;
    stockpulse_db::insert_investment_opinion(&ctx.pool, &to_new_opinion(stock.id, &record)).await?;

    println!(
        "{} ({}): {} {}% (consensus {}%{})",
        stock.name,
        stock.code,
        record.synthesis.final_recommendation,
        record.synthesis.final_confidence,
        record.debate.consensus_level,
        if record.debate.had_debate { ", debated" } else { "" }
    );
    Ok(1)
}

/// # Errors
///
/// Returns an error if the stock filter resolves to nothing, the completion
/// key is missing, or the job run cannot be recorded.
pub(crate) async fn run_analyze(
    ctx: &AppContext,
    trigger: Trigger,
    stock_filter: Option<&str>,
) -> anyhow::Result<()> {
    let stocks = load_stocks(&ctx.pool, stock_filter).await?;
    if stocks.is_empty() {
        println!("no active stocks found for analysis; skipping run creation");
        return Ok(());
    }

    let engine = AnalysisEngine::new(
        ctx.completion_client()?,
        Arc::clone(&ctx.cache),
        Arc::new(UnavailableMarketData),
    );

    let totals = run_stage(
        &ctx.pool,
        Stage::Analyze,
        trigger,
        &stocks,
        ctx.config.max_concurrent_stocks,
        |_run_id, stock| analyze_stock(ctx, &engine, stock),
    )
    .await?;

    println!(
        "analyze: {} verdicts stored across {} stocks ({} failed)",
        totals.records,
        stocks.len(),
        totals.failed_stocks
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;
    use stockpulse_core::{Impact, Sentiment};

    use super::*;

    fn row(sentiment: &str) -> AnalyzedNewsRow {
        AnalyzedNewsRow {
            title: "수주 공시".to_string(),
            sentiment: sentiment.to_string(),
            sentiment_score: Decimal::new(-400, 3),
            impact: "medium".to_string(),
            published_at: None,
        }
    }

    #[test]
    fn readable_rows_become_agent_news() {
        let news = to_analyzed_news(row("negative")).unwrap();
        assert_eq!(news.sentiment, Sentiment::Negative);
        assert_eq!(news.impact, Impact::Medium);
        assert!((news.sentiment_score + 0.4).abs() < 1e-9);
    }

    #[test]
    fn unreadable_rows_are_skipped() {
        assert!(to_analyzed_news(row("bullish")).is_none());
    }

    #[test]
    fn snapshot_falls_back_to_none_when_serialization_fails() {
        // JSON object keys must be strings.
        let mut by_pair = HashMap::new();
        by_pair.insert((1, 2), "x");
        assert!(snapshot(&by_pair).is_none());

        let plain = snapshot(&vec!["a", "b"]).unwrap();
        assert_eq!(plain, serde_json::json!(["a", "b"]));
    }
}
