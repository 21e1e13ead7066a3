use stockpulse_core::AgentDomain;

use super::{metric_line, percent, plain, reply_format, Brief};
use crate::collector::RiskMetrics;

const SYSTEM: &str = "You are a risk management analyst specializing in Korean stock market. \
Analyze risk factors and provide investment recommendations with risk considerations.";

pub(crate) fn brief(name: &str, code: &str, data: &RiskMetrics) -> Brief {
    let metrics = [
        metric_line("변동성", data.volatility, percent),
        metric_line("베타", data.beta, plain),
        metric_line("최대 낙폭", data.max_drawdown, percent),
        format!("- 리스크 수준: {}", data.risk_level.as_str()),
    ]
    .join("\n");

    let prompt = format!(
        "당신은 한국 주식 시장의 리스크 관리 전문가입니다. 다음 종목의 리스크 수준을 분석하여 투자 의견을 제시하세요.\n\n\
         종목명: {name} ({code})\n\n\
         리스크 지표:\n{metrics}\n\n\
         분석 기준:\n\
         1. 변동성: 20% 이상이면 고위험, 10% 미만이면 저위험\n\
         2. 베타: 1.0보다 크면 시장보다 변동성 큼, 작으면 변동성 작음\n\
         3. 최대 낙폭: 30% 이상이면 고위험\n\
         4. 리스크 수준이 높으면 매도 또는 보유, 낮으면 매수 고려\n\n{}",
        reply_format("", "리스크 종합 평가")
    );

    Brief {
        domain: AgentDomain::Risk,
        system: SYSTEM,
        prompt,
    }
}
