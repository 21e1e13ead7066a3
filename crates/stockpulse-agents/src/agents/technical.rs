use stockpulse_core::AgentDomain;

use super::{grouped, metric_line, plain, reply_format, won, Brief};
use crate::collector::TechnicalIndicators;

const SYSTEM: &str = "You are a technical analyst specializing in Korean stock market. \
Analyze technical indicators and provide trading recommendations with clear reasoning.";

pub(crate) fn brief(name: &str, code: &str, data: &TechnicalIndicators) -> Brief {
    // A zero price means the feed had nothing.
    let price = data.price.filter(|p| *p > 0.0);
    let indicators = [
        metric_line("현재가", price, won),
        metric_line("5일 이동평균", data.ma5, won),
        metric_line("20일 이동평균", data.ma20, won),
        metric_line("60일 이동평균", data.ma60, won),
        metric_line("RSI", data.rsi, plain),
        metric_line("MACD", data.macd, plain),
        metric_line("거래량", data.volume, grouped),
    ]
    .join("\n");

    let prompt = format!(
        "당신은 한국 주식 시장의 기술적 분석 전문가입니다. 다음 종목의 기술적 지표를 분석하여 투자 의견을 제시하세요.\n\n\
         종목명: {name} ({code})\n\n\
         기술적 지표:\n{indicators}\n\n\
         분석 기준:\n\
         1. 이동평균선: 현재가가 이동평균선 위에 있으면 상승 추세, 아래에 있으면 하락 추세\n\
         2. RSI: 70 이상이면 과매수, 30 미만이면 과매도\n\
         3. MACD: MACD선이 신호선을 상향 돌파하면 매수 신호, 하향 돌파하면 매도 신호\n\
         4. 거래량: 평균 대비 증가하면 관심도 상승\n\n{}",
        reply_format(
            "  \"trend\": \"bullish\" | \"bearish\" | \"neutral\",\n",
            "기술적 지표 종합 평가"
        )
    );

    Brief {
        domain: AgentDomain::Technical,
        system: SYSTEM,
        prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_price_is_reported_missing() {
        let data = TechnicalIndicators {
            price: Some(0.0),
            rsi: Some(64.2),
            ..TechnicalIndicators::default()
        };
        let brief = brief("카카오", "035720", &data);
        assert!(brief.prompt.contains("- 현재가: 데이터 없음"));
        assert!(brief.prompt.contains("- RSI: 64.2"));
        assert!(brief.prompt.contains("\"trend\""));
    }
}
