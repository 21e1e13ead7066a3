use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use stockpulse_llm::CompletionClient;

use crate::agents::{self, consult};
use crate::cache::TtlCache;
use crate::collector::{AnalyzedNews, DataCollector, MarketDataSource};
use crate::consensus::{score_consensus, ConsensusScore};
use crate::debate::{resolve_disagreement, DebateOutcome};
use crate::opinion::AgentOpinions;
use crate::synthesis::{choose_model, synthesize, Synthesis};

/// Analysis type recorded for a five-agent run.
pub const ANALYSIS_TYPE_FULL: &str = "full";

/// What one analysis run needs from the caller.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub stock_code: String,
    pub stock_name: String,
    /// Sentiment-annotated news, newest first.
    pub recent_news: Vec<AnalyzedNews>,
}

/// Everything one run produced, ready to persist as a single row.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub stock_code: String,
    pub opinions: AgentOpinions,
    pub consensus: ConsensusScore,
    pub debate: DebateOutcome,
    pub synthesis: Synthesis,
    pub generation_time_ms: u64,
    pub used_cache: bool,
    pub analysis_type: &'static str,
}

/// Runs the opinion, consensus, debate and synthesis sequence for one stock.
///
/// The cache is shared by every run of an engine; each run gets its own
/// [`DataCollector`] so the cache-used flag is per run.
pub struct AnalysisEngine {
    client: Arc<dyn CompletionClient>,
    cache: Arc<TtlCache>,
    market: Arc<dyn MarketDataSource>,
}

impl AnalysisEngine {
    #[must_use]
    pub fn new(
        client: Arc<dyn CompletionClient>,
        cache: Arc<TtlCache>,
        market: Arc<dyn MarketDataSource>,
    ) -> Self {
        Self {
            client,
            cache,
            market,
        }
    }

    /// Analyze one stock. `model_draw` is a uniform value in `[0, 1)` that
    /// selects the synthesis model.
    ///
    /// Never fails: every collaborator failure degrades to that step's
    /// default.
    pub async fn run(&self, input: &AnalysisInput, model_draw: f64) -> AnalysisRecord {
        let started = Instant::now();
        let client = self.client.as_ref();
        let collector = DataCollector::new(&self.cache, self.market.as_ref());
        let name = input.stock_name.as_str();
        let code = input.stock_code.as_str();

        let (fundamental, technical, news, macroeconomic, risk) = tokio::join!(
            async {
                let data = collector.financial(code).await;
                consult(client, agents::fundamental::brief(name, code, &data)).await
            },
            async {
                let data = collector.technical(code).await;
                consult(client, agents::technical::brief(name, code, &data)).await
            },
            async {
                let data = collector.news(&input.recent_news);
                consult(client, agents::news::brief(name, &data)).await
            },
            async {
                let data = collector.macro_indicators().await;
                consult(client, agents::macroeconomic::brief(name, &data)).await
            },
            async {
                let data = collector.risk(code).await;
                consult(client, agents::risk::brief(name, code, &data)).await
            },
        );
        let opinions = AgentOpinions {
            fundamental,
            technical,
            news,
            macroeconomic,
            risk,
        };

        let consensus = score_consensus(&opinions);
        tracing::info!(
            stock = %code,
            level = consensus.level,
            buy = consensus.buy,
            sell = consensus.sell,
            hold = consensus.hold,
            "consensus scored"
        );

        let debate = if consensus.needs_debate() {
            resolve_disagreement(client, &opinions, consensus.level).await
        } else {
            DebateOutcome::skipped(consensus.level)
        };

        let model = choose_model(model_draw);
        let synthesis = synthesize(client, name, code, &opinions, &debate, model).await;

        let generation_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            stock = %code,
            recommendation = %synthesis.final_recommendation,
            confidence = synthesis.final_confidence,
            had_debate = debate.had_debate,
            model = %model,
            elapsed_ms = generation_time_ms,
            "analysis complete"
        );

        AnalysisRecord {
            stock_code: input.stock_code.clone(),
            opinions,
            consensus,
            debate,
            synthesis,
            generation_time_ms,
            used_cache: collector.used_cache(),
            analysis_type: ANALYSIS_TYPE_FULL,
        }
    }
}
