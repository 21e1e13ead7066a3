use std::time::Duration;

use serde::Serialize;
use stockpulse_core::{Impact, Sentiment};

/// Sentiment judgment for one news item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// In [-1.0, 1.0].
    pub score: f64,
    pub impact: Impact,
    /// At most five topics.
    pub key_topics: Vec<String>,
}

impl SentimentResult {
    /// Judgment used when the model gave nothing usable for an item.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.0,
            impact: Impact::Medium,
            key_topics: Vec::new(),
        }
    }
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Chunking and pacing for the dispatcher.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub batch_size: usize,
    /// Pause between consecutive chunks. Not applied after the last one.
    pub batch_delay: Duration,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            batch_delay: Duration::from_secs(1),
        }
    }
}
