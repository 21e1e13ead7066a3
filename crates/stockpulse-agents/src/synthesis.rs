use serde::Serialize;
use serde_json::Value;
use stockpulse_core::Recommendation;
use stockpulse_llm::json::{number, string_list, text};
use stockpulse_llm::{ChatModel, CompletionClient, CompletionRequest, Reply};

use crate::debate::DebateOutcome;
use crate::opinion::{percent, AgentOpinions, MAX_REASONS};

/// Share of runs synthesized with the cheaper model.
pub const CHEAP_MODEL_SHARE: f64 = 0.8;

const SYSTEM: &str = "You are a senior investment advisor synthesizing multiple expert opinions \
into a final investment recommendation. Provide clear reasoning, target price, stop loss, and \
risk factors.";

const DEFAULT_CONFIDENCE: u8 = 50;
const DEFAULT_STRATEGY: &str = "종합 분석 완료";
const FAILURE_STRATEGY: &str = "분석 중 오류 발생";

/// Final verdict for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub final_recommendation: Recommendation,
    /// 0 to 100.
    pub final_confidence: u8,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub time_horizon: Option<String>,
    pub strategy: String,
    /// At most five entries.
    pub key_reasons: Vec<String>,
    /// At most five entries.
    pub risks: Vec<String>,
    pub model: ChatModel,
}

impl Synthesis {
    fn failed(model: ChatModel) -> Self {
        Self {
            final_recommendation: Recommendation::Hold,
            final_confidence: DEFAULT_CONFIDENCE,
            target_price: None,
            stop_loss: None,
            time_horizon: None,
            strategy: FAILURE_STRATEGY.to_string(),
            key_reasons: Vec::new(),
            risks: Vec::new(),
            model,
        }
    }
}

/// Pick the synthesis model from a uniform draw in `[0, 1)`.
#[must_use]
pub fn choose_model(draw: f64) -> ChatModel {
    if draw < CHEAP_MODEL_SHARE {
        ChatModel::Gpt4oMini
    } else {
        ChatModel::Gpt4o
    }
}

fn build_prompt(name: &str, code: &str, opinions: &AgentOpinions, debate: &DebateOutcome) -> String {
    let debate_block = if debate.had_debate {
        format!(
            "[토론 결과]\n합의도: {}%\n요약: {}\n\n",
            debate.consensus_level,
            debate.debate_summary.as_deref().unwrap_or_default()
        )
    } else {
        String::new()
    };

    format!(
        "다음 5명의 투자 전문가가 {name} ({code}) 종목에 대해 분석한 결과를 종합하여 최종 투자 의견을 제시하세요.\n\n\
         {digest}{debate_block}\
         위 분석 결과를 종합하여 다음 JSON 형식으로 최종 투자 의견을 제시하세요:\n\
         {{\n  \"finalRecommendation\": \"buy\" | \"sell\" | \"hold\",\n  \
         \"finalConfidence\": 0-100,\n  \
         \"targetPrice\": 숫자 (선택사항),\n  \
         \"stopLoss\": 숫자 (선택사항),\n  \
         \"timeHorizon\": \"단기\" | \"중기\" | \"장기\" (선택사항),\n  \
         \"strategy\": \"투자 전략 (200자 이내)\",\n  \
         \"keyReasons\": [\"주요 이유1\", \"주요 이유2\", \"주요 이유3\"],\n  \
         \"risks\": [\"리스크 요소1\", \"리스크 요소2\"]\n}}\n\n\
         JSON만 응답하고 다른 텍스트는 포함하지 마세요.",
        digest = opinions.digest(),
    )
}

fn parse_synthesis(reply: &Value, model: ChatModel) -> Result<Synthesis, String> {
    let final_recommendation = text(reply.get("finalRecommendation"))
        .ok_or_else(|| "reply has no finalRecommendation".to_string())?
        .parse::<Recommendation>()
        .map_err(|e| e.to_string())?;

    Ok(Synthesis {
        final_recommendation,
        final_confidence: percent(reply.get("finalConfidence"), DEFAULT_CONFIDENCE),
        target_price: number(reply.get("targetPrice")),
        stop_loss: number(reply.get("stopLoss")),
        time_horizon: text(reply.get("timeHorizon")),
        strategy: text(reply.get("strategy")).unwrap_or_else(|| DEFAULT_STRATEGY.to_string()),
        key_reasons: string_list(reply.get("keyReasons"), MAX_REASONS),
        risks: string_list(reply.get("risks"), MAX_REASONS),
        model,
    })
}

/// Combine the opinions and debate outcome into a final verdict with `model`.
/// Any failure yields `hold/50` with empty lists.
pub async fn synthesize(
    client: &dyn CompletionClient,
    name: &str,
    code: &str,
    opinions: &AgentOpinions,
    debate: &DebateOutcome,
    model: ChatModel,
) -> Synthesis {
    let request = CompletionRequest::new(model, SYSTEM, build_prompt(name, code, opinions, debate));
    Reply::from_result(client.complete_json(&request).await, |value| {
        parse_synthesis(&value, model)
    })
    .or_fallback(|_| Synthesis::failed(model))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stockpulse_core::AgentDomain;

    use super::*;
    use crate::opinion::AgentOpinion;

    #[test]
    fn model_choice_follows_the_draw() {
        assert_eq!(choose_model(0.0), ChatModel::Gpt4oMini);
        assert_eq!(choose_model(0.799), ChatModel::Gpt4oMini);
        assert_eq!(choose_model(0.8), ChatModel::Gpt4o);
        assert_eq!(choose_model(0.999), ChatModel::Gpt4o);
    }

    #[test]
    fn reply_fields_are_clamped_and_truncated() {
        let synthesis = parse_synthesis(
            &json!({
                "finalRecommendation": "BUY",
                "finalConfidence": 130,
                "targetPrice": 85000,
                "timeHorizon": "중기",
                "keyReasons": ["a", "b", "c", "d", "e", "f", "g"],
                "risks": "환율"
            }),
            ChatModel::Gpt4o,
        )
        .unwrap();
        assert_eq!(synthesis.final_recommendation, Recommendation::Buy);
        assert_eq!(synthesis.final_confidence, 100);
        assert_eq!(synthesis.target_price, Some(85_000.0));
        assert_eq!(synthesis.stop_loss, None);
        assert_eq!(synthesis.strategy, "종합 분석 완료");
        assert_eq!(synthesis.key_reasons.len(), 5);
        assert_eq!(synthesis.risks, vec!["환율".to_string()]);
        assert_eq!(synthesis.model, ChatModel::Gpt4o);
    }

    #[test]
    fn missing_confidence_is_fifty() {
        let synthesis =
            parse_synthesis(&json!({"finalRecommendation": "sell"}), ChatModel::Gpt4oMini).unwrap();
        assert_eq!(synthesis.final_confidence, 50);
    }

    #[test]
    fn invalid_recommendation_is_rejected() {
        assert!(parse_synthesis(&json!({"finalRecommendation": "accumulate"}), ChatModel::Gpt4o).is_err());
    }

    #[test]
    fn prompt_includes_debate_only_when_held() {
        let opinions = AgentOpinions {
            fundamental: AgentOpinion::fallback(AgentDomain::Fundamental),
            technical: AgentOpinion::fallback(AgentDomain::Technical),
            news: AgentOpinion::fallback(AgentDomain::News),
            macroeconomic: AgentOpinion::fallback(AgentDomain::Macro),
            risk: AgentOpinion::fallback(AgentDomain::Risk),
        };

        let skipped = build_prompt("삼성전자", "005930", &opinions, &DebateOutcome::skipped(100));
        assert!(!skipped.contains("[토론 결과]"));
        assert!(skipped.contains("[Risk Agent]\n의견: hold\n신뢰도: 30%"));

        let debated = DebateOutcome {
            had_debate: true,
            consensus_level: 65,
            debate_summary: Some("보유 우세".to_string()),
            changed_agents: Vec::new(),
        };
        let prompt = build_prompt("삼성전자", "005930", &opinions, &debated);
        assert!(prompt.contains("[토론 결과]\n합의도: 65%\n요약: 보유 우세"));
    }
}
