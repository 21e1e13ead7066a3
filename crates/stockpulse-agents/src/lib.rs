//! Multi-agent investment analysis: market data collection behind a TTL
//! cache, five domain opinions, consensus scoring, an optional debate round
//! and a final synthesis.

mod agents;
pub mod cache;
pub mod collector;
pub mod consensus;
pub mod debate;
pub mod engine;
pub mod opinion;
pub mod synthesis;

pub use cache::{CacheCategory, Clock, SystemClock, TtlCache};
pub use collector::{
    AnalyzedNews, DataCollector, FinancialMetrics, MacroIndicators, MarketDataError,
    MarketDataSource, NewsContext, RiskLevel, RiskMetrics, SentimentTrend, TechnicalIndicators,
    UnavailableMarketData,
};
pub use consensus::{score_consensus, ConsensusScore, DEBATE_THRESHOLD};
pub use debate::{resolve_disagreement, DebateOutcome};
pub use engine::{AnalysisEngine, AnalysisInput, AnalysisRecord};
pub use opinion::{AgentOpinion, AgentOpinions};
pub use synthesis::{choose_model, synthesize, Synthesis};
