//! Clickbait and low-quality rejection.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use stockpulse_core::NewsItem;

const MIN_DESCRIPTION_CHARS: usize = 50;

static CLICKBAIT_TITLE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"속보",
        r"충격",
        r"긴급",
        r"대박",
        r"!\s*$",
        r"[?!]{2,}",
        r"주목|화제|폭발",
        r"놀라운|믿을 수 없는",
        r"이것만 알면",
        r"숨겨진 진실",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid clickbait regex"))
    .collect()
});

static REACTION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"네티즌|댓글|반응|누리꾼").expect("valid reaction regex"));

static SPECULATIVE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"것으로 보인다|것으로 추정|것으로 전망").expect("valid speculation regex")
});

static ANONYMOUS_ATTRIBUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"관계자에 따르면|익명의 관계자").expect("valid attribution regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityReason {
    Clickbait,
    LowQuality,
}

#[derive(Debug, Clone)]
pub struct QualityRejection<'a> {
    pub item: &'a NewsItem,
    pub reason: QualityReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityStats {
    pub total: usize,
    pub passed: usize,
    pub filtered: usize,
    pub clickbait: usize,
    pub low_quality: usize,
}

#[derive(Debug, Clone)]
pub struct QualityOutcome<'a> {
    pub passed: Vec<&'a NewsItem>,
    pub filtered: Vec<QualityRejection<'a>>,
    pub stats: QualityStats,
}

fn is_clickbait(title: &str) -> bool {
    CLICKBAIT_TITLE.iter().any(|re| re.is_match(title))
}

fn is_low_quality(item: &NewsItem) -> bool {
    let description = item.description.as_deref().filter(|d| !d.is_empty());

    if description.is_some_and(|d| d.chars().count() < MIN_DESCRIPTION_CHARS) {
        return true;
    }
    if REACTION_TITLE.is_match(&item.title) || SPECULATIVE_TITLE.is_match(&item.title) {
        return true;
    }
    description.is_some_and(|d| ANONYMOUS_ATTRIBUTION.is_match(d))
}

/// Why `item` would be rejected, if at all. Clickbait is reported ahead of
/// low quality when both apply.
#[must_use]
pub fn quality_verdict(item: &NewsItem) -> Option<QualityReason> {
    if is_clickbait(&item.title) {
        Some(QualityReason::Clickbait)
    } else if is_low_quality(item) {
        Some(QualityReason::LowQuality)
    } else {
        None
    }
}

/// Drop sensational headlines and thin or speculative reporting.
#[must_use]
pub fn filter_clickbait_and_low_quality<'a>(items: &[&'a NewsItem]) -> QualityOutcome<'a> {
    let mut passed = Vec::new();
    let mut filtered = Vec::new();
    let mut stats = QualityStats {
        total: items.len(),
        ..QualityStats::default()
    };

    for &item in items {
        match quality_verdict(item) {
            None => passed.push(item),
            Some(reason) => {
                match reason {
                    QualityReason::Clickbait => stats.clickbait += 1,
                    QualityReason::LowQuality => stats.low_quality += 1,
                }
                filtered.push(QualityRejection { item, reason });
            }
        }
    }

    stats.passed = passed.len();
    stats.filtered = filtered.len();

    QualityOutcome {
        passed,
        filtered,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn item(title: &str, description: Option<&str>) -> NewsItem {
        NewsItem {
            id: 1,
            stock_id: 1,
            title: title.to_string(),
            description: description.map(str::to_string),
            source: Some("연합뉴스".to_string()),
            url: None,
            published_at: None,
            collected_at: Utc::now(),
        }
    }

    fn long_description() -> String {
        "삼성전자는 올해 3분기 연결 기준 영업이익이 전년 동기 대비 크게 증가했다고 공시했다. 메모리 가격 반등이 주효했다.".to_string()
    }

    #[test]
    fn clickbait_titles_are_flagged() {
        for title in [
            "[속보] 삼성전자 급등",
            "충격적인 실적 발표",
            "이 종목 대박 났다",
            "주가가 오른다!",
            "정말 오를까?!",
            "투자자 주목 종목",
            "놀라운 반전",
            "이것만 알면 수익",
            "숨겨진 진실 공개",
        ] {
            let news = item(title, Some(&long_description()));
            assert_eq!(
                quality_verdict(&news),
                Some(QualityReason::Clickbait),
                "title {title:?} should be clickbait"
            );
        }
    }

    #[test]
    fn trailing_exclamation_with_spaces_is_clickbait() {
        let news = item("실적 발표 !  ", None);
        assert_eq!(quality_verdict(&news), Some(QualityReason::Clickbait));
    }

    #[test]
    fn short_description_is_low_quality() {
        let news = item("삼성전자 3분기 실적 발표", Some("짧은 요약"));
        assert_eq!(quality_verdict(&news), Some(QualityReason::LowQuality));
    }

    #[test]
    fn missing_or_empty_description_is_not_low_quality() {
        assert_eq!(quality_verdict(&item("삼성전자 3분기 실적 발표", None)), None);
        assert_eq!(quality_verdict(&item("삼성전자 3분기 실적 발표", Some(""))), None);
    }

    #[test]
    fn reaction_and_speculation_titles_are_low_quality() {
        let desc = long_description();
        for title in ["네티즌 반응 뜨거워", "실적 개선될 것으로 전망", "누리꾼들 술렁"] {
            assert_eq!(
                quality_verdict(&item(title, Some(&desc))),
                Some(QualityReason::LowQuality),
                "title {title:?} should be low quality"
            );
        }
    }

    #[test]
    fn anonymous_attribution_in_description_is_low_quality() {
        let desc = format!("{} 익명의 관계자가 밝혔다.", long_description());
        assert_eq!(
            quality_verdict(&item("삼성전자 신규 투자 결정", Some(&desc))),
            Some(QualityReason::LowQuality)
        );
    }

    #[test]
    fn clickbait_takes_priority_in_stats() {
        let both = item("충격 네티즌 반응", Some("짧음"));
        let low = item("누리꾼 관심", None);
        let clean = item("삼성전자 분기 배당 결정", Some(&long_description()));
        let refs = vec![&both, &low, &clean];
        let outcome = filter_clickbait_and_low_quality(&refs);
        assert_eq!(
            outcome.stats,
            QualityStats {
                total: 3,
                passed: 1,
                filtered: 2,
                clickbait: 1,
                low_quality: 1,
            }
        );
        assert_eq!(outcome.filtered[0].reason, QualityReason::Clickbait);
    }
}
