use std::fmt::Write as _;

use stockpulse_core::NewsItem;
use stockpulse_llm::{ChatModel, CompletionClient, CompletionRequest};

use crate::envelope::{record_index, records, to_result};
use crate::types::{SentimentConfig, SentimentResult};

const SYSTEM_PROMPT: &str = "You are a financial news sentiment analyst. Analyze sentiment of \
news articles and return results as a JSON array. Be concise and accurate.";

/// Render one chunk; each item is tagged with its index in the full input.
fn build_prompt(chunk: &[NewsItem], offset: usize) -> String {
    let mut listing = String::new();
    for (i, item) in chunk.iter().enumerate() {
        let _ = write!(listing, "[{}] 제목: {}", offset + i, item.title);
        if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(listing, "\n   요약: {description}");
        }
        listing.push_str("\n\n");
    }

    format!(
        "다음 {count}개 뉴스의 감성을 분석하세요.\n\n뉴스 목록:\n{listing}\
         각 뉴스에 대해 다음 정보를 분석하세요:\n\
         - sentiment: \"positive\", \"negative\", \"neutral\"\n\
         - score: 감성 점수 (-1.0 ~ 1.0)\n\
         - impact: \"high\", \"medium\", \"low\" (주가 영향도)\n\
         - keyTopics: 주요 키워드 배열 (최대 5개)\n\n\
         다음 형식의 JSON으로 반환하세요:\n\
         {{\"results\": [{{\"index\": {offset}, \"sentiment\": \"positive\", \"score\": 0.8, \
         \"impact\": \"high\", \"keyTopics\": [\"실적\", \"증가\"]}}]}}",
        count = chunk.len(),
    )
}

/// Score every item, one completion request per chunk of `config.batch_size`.
///
/// The returned vector has exactly one entry per input item, in input order.
/// A failed request, a reply in an unknown shape, or a missing record leaves
/// the affected items neutral. Chunks run sequentially with
/// `config.batch_delay` between them.
pub async fn batch_analyze_sentiment(
    client: &dyn CompletionClient,
    items: &[NewsItem],
    config: &SentimentConfig,
) -> Vec<SentimentResult> {
    let mut results = vec![SentimentResult::neutral(); items.len()];
    let batch_size = config.batch_size.max(1);
    let chunk_count = items.len().div_ceil(batch_size);

    for (chunk_no, chunk) in items.chunks(batch_size).enumerate() {
        let offset = chunk_no * batch_size;
        let range = offset..offset + chunk.len();

        tracing::info!(
            chunk = chunk_no + 1,
            chunks = chunk_count,
            size = chunk.len(),
            "scoring sentiment chunk"
        );

        let request = CompletionRequest::new(
            ChatModel::Gpt4oMini,
            SYSTEM_PROMPT,
            build_prompt(chunk, offset),
        );

        match client.complete_json(&request).await {
            Ok(reply) => {
                let mut matched = 0usize;
                for record in records(reply) {
                    match record_index(&record) {
                        Some(index) if range.contains(&index) => {
                            results[index] = to_result(&record);
                            matched += 1;
                        }
                        other => {
                            tracing::warn!(
                                index = ?other,
                                chunk = chunk_no + 1,
                                "sentiment record does not match an item in this chunk"
                            );
                        }
                    }
                }
                if matched < chunk.len() {
                    tracing::warn!(
                        chunk = chunk_no + 1,
                        matched,
                        expected = chunk.len(),
                        "sentiment reply incomplete, unmatched items stay neutral"
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    chunk = chunk_no + 1,
                    error = %e,
                    "sentiment chunk failed, items stay neutral"
                );
            }
        }

        if chunk_no + 1 < chunk_count && !config.batch_delay.is_zero() {
            tokio::time::sleep(config.batch_delay).await;
        }
    }

    results
}
