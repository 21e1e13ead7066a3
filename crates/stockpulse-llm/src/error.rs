use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("completion response contained no message content")]
    EmptyCompletion,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid reply: {0}")]
    InvalidReply(String),
}
