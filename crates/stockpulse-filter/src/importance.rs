use stockpulse_core::Importance;

/// Earnings, M&A, launches, capacity, litigation and regulation.
const HIGH_KEYWORDS: &[&str] = &[
    "실적", "영업이익", "순이익", "매출", "IR", "인수", "합병", "M&A", "투자유치", "신제품",
    "출시", "론칭", "증설", "공장", "투자", "소송", "규제", "제재", "과징금",
];

/// Contracts, partnerships, governance and capital events.
const MEDIUM_KEYWORDS: &[&str] = &[
    "계약", "협약", "파트너십", "수주", "공급", "특허", "기술", "임원", "인사", "임원진", "CEO",
    "CFO", "CTO", "주주", "배당", "자사주", "매각", "매입", "지분", "증자", "감자", "상장",
    "상장폐지", "정지", "경고",
];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|keyword| haystack.contains(keyword.to_lowercase().as_str()))
}

/// Label an item by case-insensitive substring match of its title and
/// description against the high table, then the medium table.
///
/// Short ASCII keywords match inside longer words ("IR" in "their"); that
/// looseness is accepted.
#[must_use]
pub fn classify_importance(title: &str, description: Option<&str>) -> Importance {
    let text = format!("{title} {}", description.unwrap_or("")).to_lowercase();

    if contains_any(&text, HIGH_KEYWORDS) {
        Importance::High
    } else if contains_any(&text, MEDIUM_KEYWORDS) {
        Importance::Medium
    } else {
        Importance::Low
    }
}
