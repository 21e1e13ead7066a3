//! HTML-to-text helpers shared by search results and article bodies.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)</?[A-Za-z!][^>]*>").expect("valid tag regex"));

static NON_TEXT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>")
        .expect("valid non-text block regex")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Collapse runs of whitespace to one space and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Strip tags, then decode entities, then collapse whitespace.
///
/// Tags are removed before decoding so that escaped markup such as
/// `&lt;b&gt;` survives as literal text.
#[must_use]
pub fn clean_snippet(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    collapse_whitespace(&decoded)
}

/// Visible text of an HTML fragment: scripts, styles and comments dropped,
/// block tags turned into spaces.
#[must_use]
pub fn visible_text(html: &str) -> String {
    let without_blocks = NON_TEXT_BLOCK_RE.replace_all(html, " ");
    let without_comments = COMMENT_RE.replace_all(&without_blocks, " ");
    let stripped = TAG_RE.replace_all(&without_comments, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    collapse_whitespace(&decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_loses_highlight_tags_and_entities() {
        assert_eq!(
            clean_snippet("<b>삼성전자</b>, 3분기 &quot;깜짝&quot; 실적"),
            "삼성전자, 3분기 \"깜짝\" 실적"
        );
    }

    #[test]
    fn escaped_markup_stays_literal() {
        assert_eq!(clean_snippet("a &lt;b&gt; c"), "a <b> c");
    }

    #[test]
    fn visible_text_skips_scripts_and_styles() {
        let html = "<div>본문<script>var x = '<p>';</script><style>p{}</style>\n\n  계속<!-- ad --></div>";
        assert_eq!(visible_text(html), "본문 계속");
    }
}
