use thiserror::Error;

/// Failures of the news search API.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by news search (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// Failures of fetching and extracting one article's body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid article URL \"{url}\"")]
    InvalidUrl { url: String },

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extracted body from {url} too short ({chars} chars)")]
    TooShort { url: String, chars: usize },
}
