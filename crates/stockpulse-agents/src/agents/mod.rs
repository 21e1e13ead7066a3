//! Prompt builders for the five domain analysts and the shared call path.

pub(crate) mod fundamental;
pub(crate) mod macroeconomic;
pub(crate) mod news;
pub(crate) mod risk;
pub(crate) mod technical;

use stockpulse_core::AgentDomain;
use stockpulse_llm::{ChatModel, CompletionClient, CompletionRequest, Reply};

use crate::opinion::{parse_opinion, AgentOpinion};

/// Closing instructions shared by every analyst prompt. `{extra}` lines are
/// domain-specific reply fields.
fn reply_format(extra: &str, evaluation_hint: &str) -> String {
    format!(
        "다음 JSON 형식으로 응답하세요:\n\
         {{\n  \"recommendation\": \"buy\" | \"sell\" | \"hold\",\n  \
         \"confidence\": 0-100,\n  \
         \"reasoning\": [\"이유1\", \"이유2\", \"이유3\"],\n{extra}  \
         \"evaluation\": \"{evaluation_hint} (100자 이내)\"\n}}\n\n\
         JSON만 응답하고 다른 텍스트는 포함하지 마세요."
    )
}

/// What to ask one analyst.
pub(crate) struct Brief {
    pub domain: AgentDomain,
    pub system: &'static str,
    pub prompt: String,
}

/// Ask one analyst. Any failure yields the domain's `hold/30` fallback.
pub(crate) async fn consult(client: &dyn CompletionClient, brief: Brief) -> AgentOpinion {
    let domain = brief.domain;
    let request = CompletionRequest::new(ChatModel::Gpt4oMini, brief.system, brief.prompt);
    let reply = Reply::from_result(client.complete_json(&request).await, |value| {
        parse_opinion(domain, &value)
    });
    reply.or_fallback(|reason| {
        tracing::warn!(agent = %domain, reason, "agent opinion falls back to hold");
        AgentOpinion::fallback(domain)
    })
}

/// `- {label}: {rendered}` or the placeholder for unknown values.
fn metric_line(label: &str, value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    match value {
        Some(v) => format!("- {label}: {}", render(v)),
        None => format!("- {label}: 데이터 없음"),
    }
}

/// Thousands-separated, with two decimals when not integral.
fn grouped(value: f64) -> String {
    let rendered = if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    };
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut out = String::from(sign);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn won(value: f64) -> String {
    format!("{}원", grouped(value))
}

fn percent(value: f64) -> String {
    format!("{value}%")
}

fn plain(value: f64) -> String {
    value.to_string()
}
