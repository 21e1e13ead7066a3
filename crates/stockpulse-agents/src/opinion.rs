use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use stockpulse_core::{AgentDomain, Recommendation};
use stockpulse_llm::json::{number, string_list, text};

pub(crate) const MAX_REASONS: usize = 5;
const MAX_KEY_TOPICS: usize = 5;

/// Confidence given to an opinion that could not be obtained.
pub const FALLBACK_CONFIDENCE: u8 = 30;

/// Confidence assumed when a reply omits it.
const DEFAULT_CONFIDENCE: u8 = 50;

/// One analyst's verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOpinion {
    pub domain: AgentDomain,
    pub recommendation: Recommendation,
    /// 0 to 100.
    pub confidence: u8,
    /// At most five entries.
    pub reasoning: Vec<String>,
    pub evaluation: Option<String>,
    /// Topics the news analyst singled out; empty for the other domains.
    pub key_topics: Vec<String>,
}

impl AgentOpinion {
    /// `hold/30` with a reason naming the missing input.
    #[must_use]
    pub fn fallback(domain: AgentDomain) -> Self {
        Self {
            domain,
            recommendation: Recommendation::Hold,
            confidence: FALLBACK_CONFIDENCE,
            reasoning: vec![unavailable_reason(domain).to_string()],
            evaluation: None,
            key_topics: Vec::new(),
        }
    }
}

fn unavailable_reason(domain: AgentDomain) -> &'static str {
    match domain {
        AgentDomain::Fundamental => "재무 데이터 부족으로 분석 불가",
        AgentDomain::Technical => "기술적 지표 데이터 부족으로 분석 불가",
        AgentDomain::News => "뉴스 데이터 부족으로 분석 불가",
        AgentDomain::Macro => "거시경제 데이터 부족으로 분석 불가",
        AgentDomain::Risk => "리스크 데이터 부족으로 분석 불가",
    }
}

/// Heading used for a domain when opinions are shown to another model.
pub(crate) fn agent_label(domain: AgentDomain) -> &'static str {
    match domain {
        AgentDomain::Fundamental => "Fundamental Agent",
        AgentDomain::Technical => "Technical Agent",
        AgentDomain::News => "News Agent",
        AgentDomain::Macro => "Macro Agent",
        AgentDomain::Risk => "Risk Agent",
    }
}

/// The five opinions of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOpinions {
    pub fundamental: AgentOpinion,
    pub technical: AgentOpinion,
    pub news: AgentOpinion,
    pub macroeconomic: AgentOpinion,
    pub risk: AgentOpinion,
}

impl AgentOpinions {
    /// In [`AgentDomain::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentOpinion> {
        [
            &self.fundamental,
            &self.technical,
            &self.news,
            &self.macroeconomic,
            &self.risk,
        ]
        .into_iter()
    }

    /// Bracketed block per agent, as shown to the debate and synthesis models.
    pub(crate) fn digest(&self) -> String {
        let mut out = String::new();
        for opinion in self.iter() {
            let _ = write!(
                out,
                "[{}]\n의견: {}\n신뢰도: {}%\n근거: {}\n\n",
                agent_label(opinion.domain),
                opinion.recommendation,
                opinion.confidence,
                opinion.reasoning.join(", ")
            );
        }
        out
    }
}

/// A 0-100 score from a reply field, rounded. Missing or unreadable values
/// give `default`; out-of-range values are clamped. An explicit 0 is kept.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn percent(value: Option<&Value>, default: u8) -> u8 {
    number(value).map_or(default, |n| n.clamp(0.0, 100.0).round() as u8)
}

/// Validate an agent reply.
///
/// The recommendation must be one of buy, sell or hold. Other fields are
/// defaulted: confidence 50, reasoning a single placeholder line.
pub(crate) fn parse_opinion(domain: AgentDomain, reply: &Value) -> Result<AgentOpinion, String> {
    let recommendation = text(reply.get("recommendation"))
        .ok_or_else(|| "reply has no recommendation".to_string())?
        .parse::<Recommendation>()
        .map_err(|e| e.to_string())?;

    let mut reasoning = string_list(reply.get("reasoning"), MAX_REASONS);
    if reasoning.is_empty() {
        reasoning.push("분석 완료".to_string());
    }

    Ok(AgentOpinion {
        domain,
        recommendation,
        confidence: percent(reply.get("confidence"), DEFAULT_CONFIDENCE),
        reasoning,
        evaluation: text(reply.get("evaluation")),
        key_topics: if domain == AgentDomain::News {
            string_list(reply.get("keyTopics"), MAX_KEY_TOPICS)
        } else {
            Vec::new()
        },
    })
}
