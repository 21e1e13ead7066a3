//! Completion-service boundary: the [`CompletionClient`] seam, an
//! OpenAI-compatible implementation, and helpers for turning loosely-typed
//! JSON replies into validated values.

pub mod client;
pub mod error;
pub mod json;
pub mod model;
pub mod reply;
mod retry;
pub mod structurize;

pub use client::{CompletionClient, CompletionRequest, OpenAiClient};
pub use error::LlmError;
pub use model::ChatModel;
pub use reply::Reply;
pub use structurize::{structure_news_content, StructuredContent};
