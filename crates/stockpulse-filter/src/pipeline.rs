//! Source → dedup → quality chain with the stats and per-item annotations
//! the filter stage persists.

use std::collections::HashSet;

use serde::Serialize;
use stockpulse_core::{Importance, NewsItem, SourceCatalog, SourceTier};

use crate::dedup::{remove_duplicates, DedupStats};
use crate::importance::classify_importance;
use crate::quality::{filter_clickbait_and_low_quality, QualityStats};
use crate::round2;
use crate::source::{filter_by_source, source_tier, SourceStats};

/// Per-run summary row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteringStats {
    pub raw_count: usize,
    pub after_source_filter: usize,
    pub after_dedup: usize,
    pub after_quality_filter: usize,
    pub final_count: usize,
    /// Percentage of raw items removed, two decimals.
    pub filter_rate: f64,
    pub avg_similarity: f64,
    pub high_importance_count: usize,
}

/// Annotation written back to every input item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterAnnotation {
    pub news_id: i64,
    pub filter_score: f64,
    pub source_tier: SourceTier,
    pub passed: bool,
}

#[derive(Debug, Clone)]
pub struct FilterReport<'a> {
    pub passed: Vec<&'a NewsItem>,
    pub annotations: Vec<FilterAnnotation>,
    pub stats: FilteringStats,
    pub source: SourceStats,
    pub dedup: DedupStats,
    pub quality: QualityStats,
}

/// Heuristic completeness score for an item that survived every filter.
#[must_use]
pub fn filter_score(item: &NewsItem) -> f64 {
    let mut score = 0.5;

    if item.source.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        score += 0.2;
    }
    if item
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > 100)
    {
        score += 0.1;
    }
    if (20..=100).contains(&item.title.chars().count()) {
        score += 0.1;
    }

    f64::min(score, 1.0)
}

#[allow(clippy::cast_precision_loss)]
fn filter_rate(raw: usize, remaining: usize) -> f64 {
    if raw == 0 {
        return 0.0;
    }
    round2((raw - remaining) as f64 / raw as f64 * 100.0)
}

/// Run the three filters in order and annotate every input item.
///
/// Items removed at any stage get a score of 0; survivors get
/// [`filter_score`]. Annotations follow input order.
#[must_use]
pub fn run_filter_pipeline<'a>(
    items: &'a [NewsItem],
    catalog: &SourceCatalog,
    dedup_threshold: f64,
) -> FilterReport<'a> {
    let raw: Vec<&'a NewsItem> = items.iter().collect();

    let by_source = filter_by_source(&raw, catalog);
    let deduped = remove_duplicates(&by_source.passed, dedup_threshold);
    let by_quality = filter_clickbait_and_low_quality(&deduped.unique);

    let passed = by_quality.passed;
    let passed_ids: HashSet<i64> = passed.iter().map(|item| item.id).collect();

    let annotations = items
        .iter()
        .map(|item| {
            let survived = passed_ids.contains(&item.id);
            FilterAnnotation {
                news_id: item.id,
                filter_score: if survived { filter_score(item) } else { 0.0 },
                source_tier: source_tier(item, catalog),
                passed: survived,
            }
        })
        .collect();

    let high_importance_count = passed
        .iter()
        .filter(|item| {
            classify_importance(&item.title, item.description.as_deref()) == Importance::High
        })
        .count();

    let stats = FilteringStats {
        raw_count: items.len(),
        after_source_filter: by_source.stats.passed,
        after_dedup: deduped.stats.unique,
        after_quality_filter: by_quality.stats.passed,
        final_count: passed.len(),
        filter_rate: filter_rate(items.len(), passed.len()),
        avg_similarity: deduped.stats.avg_similarity,
        high_importance_count,
    };

    tracing::debug!(
        raw = stats.raw_count,
        after_source = stats.after_source_filter,
        after_dedup = stats.after_dedup,
        after_quality = stats.after_quality_filter,
        filter_rate = stats.filter_rate,
        "filter pipeline finished"
    );

    FilterReport {
        passed,
        annotations,
        stats,
        source: by_source.stats,
        dedup: deduped.stats,
        quality: by_quality.stats,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
