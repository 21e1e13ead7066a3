//! Condense a crawled article into the enrichment fields stored on a news item.

use serde::Serialize;
use serde_json::Value;
use stockpulse_core::Impact;

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::LlmError;
use crate::json::{string_list, text};
use crate::model::ChatModel;

const MAX_CONTENT_CHARS: usize = 3000;
const STRUCTURIZE_TEMPERATURE: f64 = 0.3;

const SYSTEM_PROMPT: &str = "You are a financial news analyst. Extract key information from news \
articles and structure it as JSON. Never reproduce the original text verbatim.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredContent {
    pub summary: String,
    pub financial_numbers: Vec<String>,
    pub key_facts: Vec<String>,
    pub future_outlook: Option<String>,
    pub impact: Impact,
}

fn build_prompt(title: &str, content: &str) -> String {
    let body: String = content.chars().take(MAX_CONTENT_CHARS).collect();
    let heading = if title.is_empty() {
        String::new()
    } else {
        format!("제목: {title}\n\n")
    };
    format!(
        "다음 뉴스의 핵심만 추출하세요. 원문을 재생산하지 말고 요약과 구조화된 정보만 제공하세요.\n\n\
         {heading}본문:\n{body}\n\n\
         다음 JSON 형식으로 응답하세요:\n\
         {{\n  \"summary\": \"핵심 요약 (200자 이내)\",\n  \
         \"financialNumbers\": [\"재무 숫자1\", \"재무 숫자2\"],\n  \
         \"keyFacts\": [\"핵심 팩트1\", \"핵심 팩트2\", \"핵심 팩트3\"],\n  \
         \"futureOutlook\": \"향후 전망 (100자 이내)\",\n  \
         \"impact\": \"high\" | \"medium\" | \"low\"\n}}\n\n\
         JSON만 응답하고 다른 텍스트는 포함하지 마세요."
    )
}

/// Validate the model's object. `summary` and a known `impact` are required.
///
/// # Errors
///
/// Returns [`LlmError::InvalidReply`] when a required field is missing or invalid.
pub fn parse_structured_content(value: &Value) -> Result<StructuredContent, LlmError> {
    let summary = text(value.get("summary"))
        .ok_or_else(|| LlmError::InvalidReply("missing summary".to_string()))?;

    let impact = value
        .get("impact")
        .and_then(Value::as_str)
        .ok_or_else(|| LlmError::InvalidReply("missing impact".to_string()))?
        .parse::<Impact>()
        .map_err(|e| LlmError::InvalidReply(e.to_string()))?;

    Ok(StructuredContent {
        summary,
        financial_numbers: string_list(value.get("financialNumbers"), usize::MAX),
        key_facts: string_list(value.get("keyFacts"), usize::MAX),
        future_outlook: text(value.get("futureOutlook")),
        impact,
    })
}

/// Ask the model to structure an article body.
///
/// # Errors
///
/// Returns [`LlmError`] on transport failure or an unusable reply; the caller
/// treats either as "no enrichment".
pub async fn structure_news_content(
    client: &dyn CompletionClient,
    title: &str,
    content: &str,
) -> Result<StructuredContent, LlmError> {
    let request = CompletionRequest::new(
        ChatModel::Gpt4oMini,
        SYSTEM_PROMPT,
        build_prompt(title, content),
    )
    .with_temperature(STRUCTURIZE_TEMPERATURE);
    let value = client.complete_json(&request).await?;
    parse_structured_content(&value)
}
