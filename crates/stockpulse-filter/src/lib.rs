//! News filtering stages: source trust, near-duplicate removal, clickbait and
//! low-quality rejection, importance labelling, and enrichment selection.
//!
//! Every stage is a pure function over borrowed [`NewsItem`]s; persistence
//! of the resulting annotations is left to the caller.
//!
//! [`NewsItem`]: stockpulse_core::NewsItem

pub mod dedup;
pub mod enrichment;
pub mod importance;
pub mod period;
pub mod pipeline;
pub mod quality;
pub mod source;
pub mod text;

pub use dedup::{
    remove_duplicates, DedupOutcome, DedupStats, DuplicateMatch, DEFAULT_SIMILARITY_THRESHOLD,
};
pub use enrichment::{enrichment_target, select_for_enrichment, EnrichmentSelection};
pub use importance::classify_importance;
pub use period::{time_period_at, time_period_for_hour};
pub use pipeline::{filter_score, run_filter_pipeline, FilterAnnotation, FilterReport, FilteringStats};
pub use quality::{
    filter_clickbait_and_low_quality, quality_verdict, QualityOutcome, QualityReason, QualityRejection, QualityStats,
};
pub use source::{
    filter_by_source, source_tier, SourceOutcome, SourceRejectReason, SourceRejection, SourceStats,
};
pub use text::{jaccard_similarity, tokenize};

/// Round to two decimal places, the precision reported in stats.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
