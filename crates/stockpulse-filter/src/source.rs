use serde::Serialize;
use stockpulse_core::{NewsItem, SourceCatalog, SourceTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRejectReason {
    MissingSource,
    Excluded,
    Untiered,
}

#[derive(Debug, Clone)]
pub struct SourceRejection<'a> {
    pub item: &'a NewsItem,
    pub reason: SourceRejectReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub total: usize,
    pub passed: usize,
    pub filtered: usize,
    pub tier1: usize,
    pub tier2: usize,
    pub tier3: usize,
}

#[derive(Debug, Clone)]
pub struct SourceOutcome<'a> {
    pub passed: Vec<&'a NewsItem>,
    pub filtered: Vec<SourceRejection<'a>>,
    pub stats: SourceStats,
}

/// Tier of the item's publisher; a missing or blank source is `Unknown`.
#[must_use]
pub fn source_tier(item: &NewsItem, catalog: &SourceCatalog) -> SourceTier {
    match item.source.as_deref().map(str::trim) {
        Some(source) if !source.is_empty() => catalog.tier_of(source),
        _ => SourceTier::Unknown,
    }
}

/// Keep items whose publisher is in one of the three trusted tiers.
///
/// Rejected items are returned with the reason so callers can audit them.
#[must_use]
pub fn filter_by_source<'a>(items: &[&'a NewsItem], catalog: &SourceCatalog) -> SourceOutcome<'a> {
    let mut passed = Vec::new();
    let mut filtered = Vec::new();
    let mut stats = SourceStats {
        total: items.len(),
        ..SourceStats::default()
    };

    for &item in items {
        let has_source = item
            .source
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if !has_source {
            filtered.push(SourceRejection {
                item,
                reason: SourceRejectReason::MissingSource,
            });
            continue;
        }

        match source_tier(item, catalog) {
            SourceTier::Tier1 => stats.tier1 += 1,
            SourceTier::Tier2 => stats.tier2 += 1,
            SourceTier::Tier3 => stats.tier3 += 1,
            SourceTier::Excluded => {
                filtered.push(SourceRejection {
                    item,
                    reason: SourceRejectReason::Excluded,
                });
                continue;
            }
            SourceTier::Unknown => {
                filtered.push(SourceRejection {
                    item,
                    reason: SourceRejectReason::Untiered,
                });
                continue;
            }
        }
        passed.push(item);
    }

    stats.passed = passed.len();
    stats.filtered = filtered.len();

    SourceOutcome {
        passed,
        filtered,
        stats,
    }
}
