use serde::Serialize;
use serde_json::Value;
use stockpulse_core::AgentDomain;
use stockpulse_llm::json::{string_list, text};
use stockpulse_llm::{ChatModel, CompletionClient, CompletionRequest, Reply};

use crate::opinion::{percent, AgentOpinions};

const SYSTEM: &str = "You are a moderator facilitating a debate among investment experts. \
Help them reach consensus by synthesizing their different viewpoints.";

const DEBATE_TEMPERATURE: f64 = 0.5;
const DEFAULT_SUMMARY: &str = "토론 완료";
const FAILURE_SUMMARY: &str = "토론 중 오류 발생";

/// Published consensus after the optional debate round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebateOutcome {
    pub had_debate: bool,
    /// 0 to 100.
    pub consensus_level: u8,
    pub debate_summary: Option<String>,
    /// Agents the moderator reports as having changed their view.
    pub changed_agents: Vec<String>,
}

impl DebateOutcome {
    /// Consensus was high enough that no debate was held.
    #[must_use]
    pub fn skipped(consensus_level: u8) -> Self {
        Self {
            had_debate: false,
            consensus_level,
            debate_summary: None,
            changed_agents: Vec::new(),
        }
    }

    fn failed(consensus_level: u8) -> Self {
        Self {
            had_debate: true,
            consensus_level,
            debate_summary: Some(FAILURE_SUMMARY.to_string()),
            changed_agents: Vec::new(),
        }
    }
}

fn build_prompt(opinions: &AgentOpinions, consensus_level: u8) -> String {
    format!(
        "다음 5명의 투자 전문가가 종목에 대해 서로 다른 의견을 가지고 있습니다. \
         이들의 의견을 조율하여 합의점을 찾아주세요.\n\n\
         {digest}\
         현재 합의도: {consensus_level}%\n\n\
         각 전문가의 의견을 검토하고, 토론을 통해 합의점을 찾아주세요. 다음 JSON 형식으로 응답하세요:\n\
         {{\n  \"consensusLevel\": 0-100,\n  \
         \"debateSummary\": \"토론 요약 (200자 이내)\",\n  \
         \"changedAgents\": [\"의견이 변경된 Agent 이름들\"]\n}}\n\n\
         JSON만 응답하고 다른 텍스트는 포함하지 마세요.",
        digest = opinions.digest(),
    )
}

fn parse_debate(reply: &Value, consensus_level: u8) -> Result<DebateOutcome, String> {
    if !reply.is_object() {
        return Err("debate reply is not an object".to_string());
    }
    Ok(DebateOutcome {
        had_debate: true,
        consensus_level: percent(reply.get("consensusLevel"), consensus_level),
        debate_summary: Some(
            text(reply.get("debateSummary")).unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        ),
        changed_agents: string_list(reply.get("changedAgents"), AgentDomain::ALL.len()),
    })
}

/// Ask the moderator to reconcile low-consensus opinions.
///
/// The returned level is clamped to 0-100 and falls back to
/// `consensus_level` when missing. Any failure keeps `consensus_level` with a
/// failure summary; `had_debate` is true either way.
pub async fn resolve_disagreement(
    client: &dyn CompletionClient,
    opinions: &AgentOpinions,
    consensus_level: u8,
) -> DebateOutcome {
    let request = CompletionRequest::new(
        ChatModel::Gpt4oMini,
        SYSTEM,
        build_prompt(opinions, consensus_level),
    )
    .with_temperature(DEBATE_TEMPERATURE);

    Reply::from_result(client.complete_json(&request).await, |value| {
        parse_debate(&value, consensus_level)
    })
    .or_fallback(|_| DebateOutcome::failed(consensus_level))
}
