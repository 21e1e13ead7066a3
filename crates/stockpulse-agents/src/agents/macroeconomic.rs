use stockpulse_core::AgentDomain;

use super::{grouped, metric_line, percent, reply_format, won, Brief};
use crate::collector::MacroIndicators;

const SYSTEM: &str = "You are a macroeconomics analyst specializing in Korean stock market. \
Analyze macroeconomic indicators and provide investment recommendations.";

pub(crate) fn brief(name: &str, data: &MacroIndicators) -> Brief {
    let indicators = [
        metric_line("KOSPI", data.kospi, grouped),
        metric_line("KOSDAQ", data.kosdaq, grouped),
        metric_line("USD/KRW", data.usd_krw, won),
        metric_line("기준금리", data.interest_rate, percent),
    ]
    .join("\n");

    let prompt = format!(
        "당신은 한국 주식 시장의 거시경제 분석 전문가입니다. 현재 거시경제 지표를 분석하여 {name} 종목에 대한 거시경제적 투자 의견을 제시하세요.\n\n\
         거시경제 지표:\n{indicators}\n\n\
         분석 기준:\n\
         1. 시장 지수 (KOSPI/KOSDAQ) 상승 추세면 긍정적\n\
         2. 환율 상승은 수출 기업에 긍정적, 내수 기업에 부정적\n\
         3. 금리 상승은 주식 시장에 부정적\n\
         4. 거시경제 전반의 흐름을 고려\n\n{}",
        reply_format("", "거시경제 종합 평가")
    );

    Brief {
        domain: AgentDomain::Macro,
        system: SYSTEM,
        prompt,
    }
}
