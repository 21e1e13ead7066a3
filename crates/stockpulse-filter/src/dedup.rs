use std::collections::HashSet;

use serde::Serialize;
use stockpulse_core::NewsItem;

use crate::round2;
use crate::text::{jaccard_similarity, tokenize};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// An item judged to repeat one that was already accepted.
#[derive(Debug, Clone)]
pub struct DuplicateMatch<'a> {
    pub item: &'a NewsItem,
    pub similar_to: i64,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupStats {
    pub total: usize,
    pub unique: usize,
    pub duplicates: usize,
    pub avg_similarity: f64,
}

#[derive(Debug, Clone)]
pub struct DedupOutcome<'a> {
    pub unique: Vec<&'a NewsItem>,
    pub duplicates: Vec<DuplicateMatch<'a>>,
    pub stats: DedupStats,
}

/// Remove near-duplicate titles, keeping the first occurrence.
///
/// Each item is compared against every item accepted so far and its best
/// title similarity decides the outcome: `>= threshold` marks it a duplicate.
/// `avg_similarity` is the mean of those best scores, the first item
/// contributing 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn remove_duplicates<'a>(items: &[&'a NewsItem], threshold: f64) -> DedupOutcome<'a> {
    let mut accepted: Vec<(&'a NewsItem, HashSet<String>)> = Vec::with_capacity(items.len());
    let mut duplicates = Vec::new();
    let mut similarity_sum = 0.0;

    for &item in items {
        let tokens = tokenize(&item.title);

        let best = accepted
            .iter()
            .map(|(kept, kept_tokens)| (kept.id, jaccard_similarity(&tokens, kept_tokens)))
            .fold(None, |best: Option<(i64, f64)>, (id, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((id, score)),
            });

        let best_score = best.map_or(0.0, |(_, score)| score);
        similarity_sum += best_score;

        match best {
            Some((similar_to, similarity)) if similarity >= threshold => {
                duplicates.push(DuplicateMatch {
                    item,
                    similar_to,
                    similarity,
                });
            }
            _ => accepted.push((item, tokens)),
        }
    }

    let avg_similarity = if items.is_empty() {
        0.0
    } else {
        round2(similarity_sum / items.len() as f64)
    };

    let unique: Vec<&'a NewsItem> = accepted.into_iter().map(|(item, _)| item).collect();
    let stats = DedupStats {
        total: items.len(),
        unique: unique.len(),
        duplicates: duplicates.len(),
        avg_similarity,
    };

    DedupOutcome {
        unique,
        duplicates,
        stats,
    }
}
