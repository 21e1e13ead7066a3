//! Client for the Naver news search API.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::NewsError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{SearchItem, SearchResponse};

/// The API rejects `display` above this.
pub const MAX_DISPLAY: u32 = 100;

/// Searches recent news by keyword, newest first.
pub struct NaverNewsClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NaverNewsClient {
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(
        base_url: &str,
        client_id: &str,
        client_secret: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            max_retries,
            backoff_base_ms,
        })
    }

    fn search_url(&self, query: &str, display: u32) -> String {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let display = display.clamp(1, MAX_DISPLAY);
        format!(
            "{}/v1/search/news.json?query={encoded}&display={display}&sort=date",
            self.base_url
        )
    }

    /// Up to `display` (1 to 100) hits for `query`, sorted by date.
    ///
    /// # Errors
    ///
    /// - [`NewsError::RateLimited`]: HTTP 429 after all retries.
    /// - [`NewsError::UnexpectedStatus`]: other non-2xx (5xx retried, 4xx not).
    /// - [`NewsError::Http`]: network failure after all retries.
    /// - [`NewsError::Deserialize`]: body is not a search response (not retried).
    pub async fn search(&self, query: &str, display: u32) -> Result<Vec<SearchItem>, NewsError> {
        let url = self.search_url(query, display);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header("X-Naver-Client-Id", &self.client_id)
                    .header("X-Naver-Client-Secret", &self.client_secret)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(NewsError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(NewsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<SearchResponse>(&body).map_err(|source| {
                    NewsError::Deserialize {
                        context: format!("news search for \"{query}\""),
                        source,
                    }
                })?;
                Ok(parsed.items)
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_encoded_and_display_clamped() {
        let client = NaverNewsClient::new("https://openapi.naver.com/", "id", "secret", 5, 0, 0)
            .unwrap();
        assert_eq!(
            client.search_url("삼성 전자", 500),
            "https://openapi.naver.com/v1/search/news.json?query=%EC%82%BC%EC%84%B1%20%EC%A0%84%EC%9E%90&display=100&sort=date"
        );
        assert!(client.search_url("a", 0).contains("display=1&"));
    }
}
