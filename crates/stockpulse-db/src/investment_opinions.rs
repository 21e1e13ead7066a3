//! Database operations for `investment_opinions`, the append-only
//! recommendation history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use stockpulse_core::Recommendation;

use crate::decimal::to_decimal;
use crate::DbError;

/// One agent's verdict as stored in its column set.
#[derive(Debug, Clone)]
pub struct OpinionColumns {
    pub recommendation: Recommendation,
    pub confidence: u8,
    pub reasoning: Vec<String>,
}

/// Everything persisted for one analysis run.
#[derive(Debug, Clone)]
pub struct NewInvestmentOpinion {
    pub stock_id: i64,
    pub fundamental: OpinionColumns,
    pub technical: OpinionColumns,
    pub news: OpinionColumns,
    pub macroeconomic: OpinionColumns,
    pub risk: OpinionColumns,
    pub had_debate: bool,
    pub debate_summary: Option<String>,
    pub consensus_level: u8,
    pub changed_agents: Vec<String>,
    pub final_recommendation: Recommendation,
    pub final_confidence: u8,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub time_horizon: Option<String>,
    pub strategy: String,
    pub key_reasons: Vec<String>,
    pub risks: Vec<String>,
    pub analysis_type: String,
    pub synthesis_model: String,
    pub generation_time_ms: u64,
    pub used_cache: bool,
    /// Full run record for later inspection.
    pub snapshot: Option<serde_json::Value>,
}

/// The verdict columns of an `investment_opinions` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvestmentOpinionRow {
    pub id: i64,
    pub stock_id: i64,
    pub created_at: DateTime<Utc>,
    pub had_debate: bool,
    pub debate_summary: Option<String>,
    pub consensus_level: i16,
    pub final_recommendation: String,
    pub final_confidence: i16,
    pub target_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub time_horizon: Option<String>,
    pub strategy: String,
    pub key_reasons: Vec<String>,
    pub risks: Vec<String>,
    pub synthesis_model: String,
    pub generation_time_ms: i64,
    pub used_cache: bool,
}

/// Appends one analysis run and returns the new row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_investment_opinion(
    pool: &PgPool,
    opinion: &NewInvestmentOpinion,
) -> Result<i64, DbError> {
    let agents = [
        &opinion.fundamental,
        &opinion.technical,
        &opinion.news,
        &opinion.macroeconomic,
        &opinion.risk,
    ];

    let mut query = sqlx::query_scalar::<_, i64>(
        "INSERT INTO investment_opinions ( \
             stock_id, \
             fundamental_recommendation, fundamental_confidence, fundamental_reasoning, \
             technical_recommendation, technical_confidence, technical_reasoning, \
             news_recommendation, news_confidence, news_reasoning, \
             macro_recommendation, macro_confidence, macro_reasoning, \
             risk_recommendation, risk_confidence, risk_reasoning, \
             had_debate, debate_summary, consensus_level, changed_agents, \
             final_recommendation, final_confidence, target_price, stop_loss, time_horizon, \
             strategy, key_reasons, risks, \
             analysis_type, synthesis_model, generation_time_ms, used_cache, snapshot) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                 $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33) \
         RETURNING id",
    )
    .bind(opinion.stock_id);

    for agent in agents {
        query = query
            .bind(agent.recommendation.as_str())
            .bind(i16::from(agent.confidence))
            .bind(&agent.reasoning);
    }

    let id = query
        .bind(opinion.had_debate)
        .bind(&opinion.debate_summary)
        .bind(i16::from(opinion.consensus_level))
        .bind(&opinion.changed_agents)
        .bind(opinion.final_recommendation.as_str())
        .bind(i16::from(opinion.final_confidence))
        .bind(opinion.target_price.map(|v| to_decimal(v, 2)))
        .bind(opinion.stop_loss.map(|v| to_decimal(v, 2)))
        .bind(&opinion.time_horizon)
        .bind(&opinion.strategy)
        .bind(&opinion.key_reasons)
        .bind(&opinion.risks)
        .bind(&opinion.analysis_type)
        .bind(&opinion.synthesis_model)
        .bind(i64::try_from(opinion.generation_time_ms).unwrap_or(i64::MAX))
        .bind(opinion.used_cache)
        .bind(&opinion.snapshot)
        .fetch_one(pool)
        .await?;

    Ok(id)
}

/// The most recent stored verdict for a stock, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_investment_opinion(
    pool: &PgPool,
    stock_id: i64,
) -> Result<Option<InvestmentOpinionRow>, DbError> {
    let row = sqlx::query_as::<_, InvestmentOpinionRow>(
        "SELECT id, stock_id, created_at, had_debate, debate_summary, consensus_level, \
                final_recommendation, final_confidence, target_price, stop_loss, time_horizon, \
                strategy, key_reasons, risks, synthesis_model, generation_time_ms, used_cache \
         FROM investment_opinions \
         WHERE stock_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(stock_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
