use stockpulse_core::AgentDomain;

use super::{grouped, metric_line, percent, plain, reply_format, won, Brief};
use crate::collector::FinancialMetrics;

const SYSTEM: &str = "You are a financial analyst specializing in Korean stock market. \
Analyze financial metrics and provide investment recommendations with clear reasoning.";

pub(crate) fn brief(name: &str, code: &str, data: &FinancialMetrics) -> Brief {
    let metrics = [
        metric_line("PER (주가수익비율)", data.per, plain),
        metric_line("PBR (주가순자산비율)", data.pbr, plain),
        metric_line("ROE (자기자본이익률)", data.roe, percent),
        metric_line("부채비율", data.debt_ratio, percent),
        metric_line("유동비율", data.current_ratio, grouped),
        metric_line("매출액", data.revenue, won),
        metric_line("영업이익", data.operating_profit, won),
        metric_line("순이익", data.net_profit, won),
    ]
    .join("\n");

    let prompt = format!(
        "당신은 한국 주식 시장의 재무 분석 전문가입니다. 다음 종목의 재무 지표를 분석하여 투자 의견을 제시하세요.\n\n\
         종목명: {name} ({code})\n\n\
         재무 지표:\n{metrics}\n\n\
         분석 기준:\n\
         1. PER: 10-20이면 적정, 20 이상이면 고평가, 10 미만이면 저평가 가능\n\
         2. PBR: 1.0 미만이면 저평가 가능, 2.0 이상이면 고평가\n\
         3. ROE: 15% 이상이면 우수, 10% 미만이면 개선 필요\n\
         4. 부채비율: 100% 미만이면 양호, 200% 이상이면 위험\n\
         5. 유동비율: 100% 이상이면 양호, 200% 이상이면 우수\n\n{}",
        reply_format("", "재무 지표 종합 평가")
    );

    Brief {
        domain: AgentDomain::Fundamental,
        system: SYSTEM,
        prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_metrics_are_listed() {
        let data = FinancialMetrics {
            per: Some(12.3),
            revenue: Some(302_231_000_000_000.0),
            ..FinancialMetrics::default()
        };
        let brief = brief("삼성전자", "005930", &data);
        assert!(brief.prompt.contains("종목명: 삼성전자 (005930)"));
        assert!(brief.prompt.contains("- PER (주가수익비율): 12.3"));
        assert!(brief.prompt.contains("- 매출액: 302,231,000,000,000원"));
        assert!(brief.prompt.contains("- PBR (주가순자산비율): 데이터 없음"));
    }
}
