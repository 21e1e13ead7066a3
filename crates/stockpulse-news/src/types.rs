use chrono::{DateTime, Utc};
use serde::Deserialize;
use stockpulse_core::SourceCatalog;

use crate::text::clean_snippet;

/// Envelope of `GET /v1/search/news.json`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One search hit as returned. Title and description carry `<b>` highlights
/// and HTML entities.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub title: String,
    #[serde(default)]
    pub originallink: Option<String>,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub pub_date: Option<String>,
}

/// A search hit ready to be stored as a news item.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedArticle {
    pub title: String,
    pub description: Option<String>,
    /// The `link` field; `(stock, url)` identifies an article.
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Host without a leading `www.`.
fn host_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_lowercase())
}

/// Clean a search hit. Returns `None` when the title is empty once cleaned.
///
/// The source is the catalog outlet serving the original article's host
/// (falling back to `link`), else the bare host.
#[must_use]
pub fn normalize_item(item: SearchItem, catalog: &SourceCatalog) -> Option<CollectedArticle> {
    let title = clean_snippet(&item.title);
    if title.is_empty() {
        return None;
    }
    let description = item
        .description
        .as_deref()
        .map(clean_snippet)
        .filter(|d| !d.is_empty());

    let origin = item
        .originallink
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(&item.link);
    let source = host_of(origin).map(|host| {
        catalog
            .resolve_host(&host)
            .map(str::to_string)
            .unwrap_or(host)
    });

    let published_at = item.pub_date.as_deref().and_then(|raw| {
        DateTime::parse_from_rfc2822(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| tracing::debug!(raw, error = %e, "unparseable pubDate"))
            .ok()
    });

    Some(CollectedArticle {
        title,
        description,
        url: item.link,
        source,
        published_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use stockpulse_core::{Outlet, SourcesFile};

    use super::*;

    fn catalog() -> SourceCatalog {
        SourceCatalog::new(SourcesFile {
            tier1: vec![Outlet {
                name: "한국경제".to_string(),
                domains: vec!["hankyung.com".to_string()],
            }],
            ..SourcesFile::default()
        })
        .unwrap()
    }

    fn item(originallink: Option<&str>, link: &str) -> SearchItem {
        SearchItem {
            title: "<b>삼성전자</b> 실적 &amp; 전망".to_string(),
            originallink: originallink.map(str::to_string),
            link: link.to_string(),
            description: Some("  ".to_string()),
            pub_date: Some("Mon, 13 Oct 2025 09:30:00 +0900".to_string()),
        }
    }

    #[test]
    fn resolves_outlet_from_original_link() {
        let article = normalize_item(
            item(
                Some("https://www.hankyung.com/article/2025101312345"),
                "https://n.news.naver.com/mnews/article/015/0005191234",
            ),
            &catalog(),
        )
        .unwrap();
        assert_eq!(article.title, "삼성전자 실적 & 전망");
        assert_eq!(article.description, None);
        assert_eq!(article.source.as_deref(), Some("한국경제"));
        assert_eq!(
            article.url,
            "https://n.news.naver.com/mnews/article/015/0005191234"
        );
        assert_eq!(
            article.published_at,
            Some(Utc.with_ymd_and_hms(2025, 10, 13, 0, 30, 0).unwrap())
        );
    }

    #[test]
    fn unknown_host_is_kept_bare() {
        let article =
            normalize_item(item(None, "https://www.example-news.kr/a/1"), &catalog()).unwrap();
        assert_eq!(article.source.as_deref(), Some("example-news.kr"));
    }

    #[test]
    fn empty_title_is_dropped() {
        let mut raw = item(None, "https://a.kr/1");
        raw.title = "<b></b>".to_string();
        assert!(normalize_item(raw, &catalog()).is_none());
    }

    #[test]
    fn bad_pub_date_is_none() {
        let mut raw = item(None, "https://a.kr/1");
        raw.pub_date = Some("yesterday".to_string());
        assert_eq!(normalize_item(raw, &catalog()).unwrap().published_at, None);
    }
}
