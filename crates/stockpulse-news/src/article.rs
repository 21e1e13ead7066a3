//! Article body fetching and extraction.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::error::FetchError;
use crate::text::visible_text;

/// Bodies shorter than this are treated as extraction failures.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Any start or end tag; group 1 is the slash, group 2 the tag name.
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)([a-z][a-z0-9]*)\b[^>]*>").expect("valid tag scanner regex")
});

fn opener(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid container regex")
}

/// Body containers in priority order. Group 1 of each is the tag name.
static BODY_CONTAINERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        opener(r#"(?i)<([a-z][a-z0-9]*)\b[^>]*\bid\s*=\s*["']newsct_article["'][^>]*>"#),
        opener(r"(?i)<(article)\b[^>]*>"),
        opener(r#"(?i)<([a-z][a-z0-9]*)\b[^>]*\bclass\s*=\s*["'][^"']*\barticle_body\b[^"']*["'][^>]*>"#),
        opener(r"(?i)<(main)\b[^>]*>"),
        opener(r"(?i)<(body)\b[^>]*>"),
    ]
});

/// Headline elements in priority order.
static TITLE_CONTAINERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        opener(r#"(?i)<(h2)\b[^>]*\bid\s*=\s*["']title_area["'][^>]*>"#),
        opener(r#"(?i)<(h3)\b[^>]*\bclass\s*=\s*["'][^"']*\bmedia_end_head_headline\b[^"']*["'][^>]*>"#),
        opener(r"(?i)<(h1)\b[^>]*>"),
        opener(r"(?i)<(title)\b[^>]*>"),
    ]
});

/// Inner HTML of the first element matched by `open`, up to its balanced
/// closing tag (or the end of the document if it is never closed).
fn element_inner<'a>(html: &'a str, open: &Regex) -> Option<&'a str> {
    let caps = open.captures(html)?;
    let whole = caps.get(0)?;
    let name = caps.get(1)?.as_str();
    let start = whole.end();
    if whole.as_str().ends_with("/>") {
        return Some("");
    }

    let mut depth = 1usize;
    for tag in ANY_TAG_RE.captures_iter(&html[start..]) {
        let Some(tag_name) = tag.get(2) else { continue };
        if !tag_name.as_str().eq_ignore_ascii_case(name) {
            continue;
        }
        let Some(full) = tag.get(0) else { continue };
        if full.as_str().ends_with("/>") {
            continue;
        }
        let closing = tag.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some(&html[start..start + full.start()]);
            }
        } else {
            depth += 1;
        }
    }
    Some(&html[start..])
}

/// Visible text of the first container in `candidates` that has any.
fn first_text(html: &str, candidates: &[Regex]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|open| element_inner(html, open))
        .map(visible_text)
        .find(|text| !text.is_empty())
}

/// Headline and body text of a news page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
}

impl Article {
    #[must_use]
    pub fn content_chars(&self) -> usize {
        self.content.chars().count()
    }
}

/// Pull the headline and body out of a page. Either may be empty.
///
/// The body is the text of the first non-empty container among
/// `#newsct_article`, `<article>`, `.article_body`, `<main>` and `<body>`,
/// falling back to the whole document.
#[must_use]
pub fn extract_article(html: &str) -> Article {
    let title = first_text(html, &TITLE_CONTAINERS).unwrap_or_default();
    let content = first_text(html, &BODY_CONTAINERS).unwrap_or_else(|| visible_text(html));
    Article { title, content }
}

/// Downloads article pages and extracts their text.
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and extract its text. Not retried.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`]: not an absolute http(s) URL.
    /// - [`FetchError::Status`]: non-2xx response.
    /// - [`FetchError::Timeout`]: the request exceeded the client timeout.
    /// - [`FetchError::Http`]: any other transport failure.
    /// - [`FetchError::TooShort`]: extracted body under [`MIN_CONTENT_CHARS`].
    pub async fn fetch_article(&self, url: &str) -> Result<Article, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9,en;q=0.8")
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| classify(e, url))?;
        let article = extract_article(&html);
        let chars = article.content_chars();
        if chars < MIN_CONTENT_CHARS {
            return Err(FetchError::TooShort {
                url: url.to_string(),
                chars,
            });
        }
        Ok(article)
    }
}

fn classify(err: reqwest::Error, url: &str) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naver_article_container_wins() {
        let html = r#"<html><body><h2 id="title_area"><span>삼성전자 실적 발표</span></h2>
            <div id="newsct_article"><div class="inner">첫 문단 <b>강조</b></div> 둘째 문단</div>
            <div class="footer">구독하기</div></body></html>"#;
        let article = extract_article(html);
        assert_eq!(article.title, "삼성전자 실적 발표");
        assert_eq!(article.content, "첫 문단 강조 둘째 문단");
    }

    #[test]
    fn falls_through_to_article_then_body() {
        let html = "<body><nav>메뉴</nav><article><p>기사 본문</p></article></body>";
        assert_eq!(extract_article(html).content, "기사 본문");

        let html = "<html><head><title>제목</title></head><body><p>본문만</p></body></html>";
        let article = extract_article(html);
        assert_eq!(article.title, "제목");
        assert_eq!(article.content, "본문만");
    }

    #[test]
    fn empty_container_is_skipped() {
        let html = r#"<div id="newsct_article">  </div><main>메인 본문</main>"#;
        assert_eq!(extract_article(html).content, "메인 본문");
    }

    #[test]
    fn class_list_matches_article_body() {
        let html = r#"<div class="wrap article_body font1">클래스 본문</div>"#;
        assert_eq!(extract_article(html).content, "클래스 본문");
    }

    #[test]
    fn fragment_without_containers_uses_whole_text() {
        assert_eq!(extract_article("<p>그냥 텍스트</p>").content, "그냥 텍스트");
    }

    #[test]
    fn nested_same_tag_is_balanced() {
        let html = "<main><main>안</main>밖</main>뒤";
        assert_eq!(extract_article(html).content, "안 밖");
    }
}
