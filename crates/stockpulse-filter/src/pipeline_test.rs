use chrono::Utc;
use stockpulse_core::{Outlet, SourcesFile};

use super::*;

fn catalog() -> SourceCatalog {
    let outlet = |name: &str| Outlet {
        name: name.to_string(),
        domains: vec![],
    };
    SourceCatalog::new(SourcesFile {
        tier1: vec![outlet("연합뉴스")],
        tier2: vec![outlet("뉴스1")],
        tier3: vec![],
        excluded: vec![outlet("위키트리")],
    })
    .unwrap()
}

fn news(id: i64, title: String, source: &str) -> NewsItem {
    NewsItem {
        id,
        stock_id: 7,
        title,
        description: None,
        source: Some(source.to_string()),
        url: None,
        published_at: None,
        collected_at: Utc::now(),
    }
}

/// 60 clean items, 10 repeats of the first ten, 10 clickbait headlines and
/// 20 items from an untracked publisher.
fn hundred_items() -> Vec<NewsItem> {
    let mut items = Vec::with_capacity(100);
    for i in 0..60 {
        items.push(news(i, format!("종목{i} 분기 보고서 {i}호 공개"), "연합뉴스"));
    }
    for i in 0..10 {
        items.push(news(60 + i, format!("종목{i} 분기 보고서 {i}호 공개"), "뉴스1"));
    }
    for i in 0..10 {
        items.push(news(70 + i, format!("충격 종목{} 분기 보고서 공개", 100 + i), "연합뉴스"));
    }
    for i in 0..20 {
        items.push(news(80 + i, format!("종목{} 분기 보고서 공개", 200 + i), "개인블로그"));
    }
    items
}

#[test]
fn end_to_end_counts_and_filter_rate() {
    let items = hundred_items();
    let report = run_filter_pipeline(&items, &catalog(), 0.8);

    assert_eq!(report.stats.raw_count, 100);
    assert_eq!(report.stats.after_source_filter, 80);
    assert_eq!(report.stats.after_dedup, 70);
    assert_eq!(report.stats.after_quality_filter, 60);
    assert_eq!(report.stats.final_count, 60);
    assert!((report.stats.filter_rate - 40.0).abs() < f64::EPSILON);

    assert_eq!(report.source.tier1, 70);
    assert_eq!(report.source.tier2, 10);
    assert_eq!(report.dedup.duplicates, 10);
    assert_eq!(report.quality.clickbait, 10);
}

#[test]
fn annotations_cover_every_item_in_order() {
    let items = hundred_items();
    let report = run_filter_pipeline(&items, &catalog(), 0.8);

    assert_eq!(report.annotations.len(), 100);
    let ids: Vec<i64> = report.annotations.iter().map(|a| a.news_id).collect();
    assert_eq!(ids, (0..100).collect::<Vec<i64>>());

    let passed = report.annotations.iter().filter(|a| a.passed).count();
    assert_eq!(passed, 60);

    for annotation in &report.annotations {
        if annotation.passed {
            assert!(annotation.filter_score > 0.0);
        } else {
            assert!(annotation.filter_score.abs() < f64::EPSILON);
        }
    }

    assert_eq!(report.annotations[65].source_tier, SourceTier::Tier2);
    assert!(!report.annotations[65].passed);
    assert_eq!(report.annotations[90].source_tier, SourceTier::Unknown);
}

#[test]
fn empty_batch_reports_zero_rate() {
    let report = run_filter_pipeline(&[], &catalog(), 0.8);
    assert_eq!(report.stats, FilteringStats::default());
    assert!(report.annotations.is_empty());
}

#[test]
fn high_importance_is_counted_among_survivors() {
    let items = vec![
        news(1, "삼성전자 3분기 영업이익 발표".to_string(), "연합뉴스"),
        news(2, "삼성전자 자사주 매입 결정".to_string(), "연합뉴스"),
        news(3, "현대차 해외 공장 증설 계획".to_string(), "위키트리"),
    ];
    let report = run_filter_pipeline(&items, &catalog(), 0.8);
    assert_eq!(report.stats.final_count, 2);
    assert_eq!(report.stats.high_importance_count, 1);
    assert_eq!(report.annotations[2].source_tier, SourceTier::Excluded);
}

#[test]
fn score_rewards_source_description_and_title_length() {
    let mut item = news(1, "짧은 제목".to_string(), "연합뉴스");
    assert!((filter_score(&item) - 0.7).abs() < 1e-9);

    item.title = "삼성전자가 3분기 메모리 반도체 부문에서 시장 예상을 웃도는 실적을 냈다".to_string();
    assert!((filter_score(&item) - 0.8).abs() < 1e-9);

    item.description = Some("가".repeat(101));
    assert!((filter_score(&item) - 0.9).abs() < 1e-9);

    item.source = None;
    assert!((filter_score(&item) - 0.7).abs() < 1e-9);
}

#[test]
fn filter_rate_rounds_to_two_decimals() {
    assert!((filter_rate(3, 2) - 33.33).abs() < 1e-9);
    assert!(filter_rate(0, 0).abs() < f64::EPSILON);
}
