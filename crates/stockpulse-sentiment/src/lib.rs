//! Batched news sentiment scoring.
//!
//! Items are sent to the completion service in fixed-size chunks and the
//! per-item judgments are mapped back by index. The output always has one
//! entry per input item, in input order; anything the model omits or garbles
//! falls back to a neutral judgment.

pub mod dispatcher;
mod envelope;
pub mod types;

pub use dispatcher::batch_analyze_sentiment;
pub use types::{SentimentConfig, SentimentResult};
