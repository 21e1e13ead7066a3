use stockpulse_core::{Importance, TimePeriod};

/// Items chosen for full-content enrichment, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentSelection<T> {
    pub target: usize,
    pub selected: Vec<T>,
}

/// `ceil(count × quota)` for the period's quota, in integer arithmetic.
#[must_use]
pub fn enrichment_target(count: usize, period: TimePeriod) -> usize {
    (count * period.enrichment_quota_percent()).div_ceil(100)
}

/// Pick up to the period's quota of items: high importance first, then
/// medium as backfill, each in input order. Low-importance items are never
/// selected, even when the quota is not met.
#[must_use]
pub fn select_for_enrichment<T: Clone>(
    labelled: &[(T, Importance)],
    period: TimePeriod,
) -> EnrichmentSelection<T> {
    let target = enrichment_target(labelled.len(), period);

    let of_level = |level: Importance| {
        labelled
            .iter()
            .filter(move |(_, importance)| *importance == level)
            .map(|(item, _)| item.clone())
    };

    let selected = of_level(Importance::High)
        .chain(of_level(Importance::Medium))
        .take(target)
        .collect();

    EnrichmentSelection { target, selected }
}
