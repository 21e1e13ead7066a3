use std::fmt::Write as _;

use stockpulse_core::AgentDomain;

use super::{reply_format, Brief};
use crate::collector::NewsContext;

const SYSTEM: &str = "You are a news sentiment analyst specializing in Korean stock market. \
Analyze news sentiment and trends to provide investment recommendations.";

/// Headlines listed in the prompt; the trend still counts all recent items.
const LISTED_HEADLINES: usize = 10;

pub(crate) fn brief(name: &str, data: &NewsContext) -> Brief {
    let mut headlines = String::new();
    for (i, item) in data.recent.iter().take(LISTED_HEADLINES).enumerate() {
        if i > 0 {
            headlines.push('\n');
        }
        let _ = write!(
            headlines,
            "[{}] {} ({}, 영향도: {})",
            i + 1,
            item.title,
            item.sentiment,
            item.impact
        );
    }
    if headlines.is_empty() {
        headlines.push_str("최근 뉴스 없음");
    }

    let prompt = format!(
        "당신은 한국 주식 시장의 뉴스 분석 전문가입니다. 다음 종목의 최근 뉴스 감성과 트렌드를 분석하여 투자 의견을 제시하세요.\n\n\
         종목명: {name}\n\n\
         최근 뉴스 ({count}개):\n{headlines}\n\n\
         감성 트렌드:\n\
         - 긍정: {positive}개\n\
         - 부정: {negative}개\n\
         - 중립: {neutral}개\n\n\
         분석 기준:\n\
         1. 긍정 뉴스가 많고 영향도가 높으면 매수 신호\n\
         2. 부정 뉴스가 많고 영향도가 높으면 매도 신호\n\
         3. 중립 뉴스가 많거나 뉴스가 적으면 보유\n\
         4. 최근 트렌드 변화에 주목\n\n{format}",
        count = data.recent.len(),
        positive = data.trend.positive,
        negative = data.trend.negative,
        neutral = data.trend.neutral,
        format = reply_format(
            "  \"keyTopics\": [\"주요 키워드1\", \"주요 키워드2\"],\n",
            "뉴스 감성 종합 평가"
        ),
    );

    Brief {
        domain: AgentDomain::News,
        system: SYSTEM,
        prompt,
    }
}

#[cfg(test)]
mod tests {
    use stockpulse_core::{Impact, Sentiment};

    use super::*;
    use crate::collector::{AnalyzedNews, SentimentTrend};

    #[test]
    fn lists_first_ten_headlines_with_trend() {
        let recent = (0..12)
            .map(|i| AnalyzedNews {
                title: format!("헤드라인 {i}"),
                sentiment: Sentiment::Positive,
                sentiment_score: 0.4,
                impact: Impact::High,
                published_at: None,
            })
            .collect();
        let context = NewsContext {
            recent,
            trend: SentimentTrend {
                positive: 12,
                negative: 0,
                neutral: 0,
            },
        };

        let prompt = brief("네이버", &context).prompt;
        assert!(prompt.contains("최근 뉴스 (12개):\n[1] 헤드라인 0 (positive, 영향도: high)"));
        assert!(prompt.contains("[10] 헤드라인 9"));
        assert!(!prompt.contains("[11]"));
        assert!(prompt.contains("- 긍정: 12개"));
    }

    #[test]
    fn empty_news_is_stated() {
        let prompt = brief("네이버", &NewsContext::default()).prompt;
        assert!(prompt.contains("최근 뉴스 (0개):\n최근 뉴스 없음"));
    }
}
