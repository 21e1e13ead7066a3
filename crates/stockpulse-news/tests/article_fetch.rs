//! `ArticleFetcher::fetch_article` against a local mock server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockpulse_news::{ArticleFetcher, FetchError};

fn fetcher(timeout_secs: u64) -> ArticleFetcher {
    ArticleFetcher::new(timeout_secs, "stockpulse-test/0.1").expect("failed to build fetcher")
}

fn page(body: &str) -> String {
    format!(
        "<html><head><title>제목</title><script>var a = 1;</script></head>\
         <body><div id=\"newsct_article\">{body}</div><footer>저작권</footer></body></html>"
    )
}

#[tokio::test]
async fn extracts_article_body() {
    let server = MockServer::start().await;
    let body = "삼성전자가 3분기 연결 기준 영업이익이 전년 동기 대비 크게 늘었다고 밝혔다. 메모리 가격 반등이 실적을 견인했다.";
    Mock::given(method("GET"))
        .and(path("/article/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(page(body)),
        )
        .mount(&server)
        .await;

    let article = fetcher(5)
        .fetch_article(&format!("{}/article/1", server.uri()))
        .await
        .unwrap();

    assert_eq!(article.title, "제목");
    assert_eq!(article.content, body);
}

#[tokio::test]
async fn short_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("짧은 본문")))
        .mount(&server)
        .await;

    let err = fetcher(5)
        .fetch_article(&format!("{}/a", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::TooShort { chars: 5, .. }));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(5)
        .fetch_article(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page("늦은 응답"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = fetcher(1)
        .fetch_article(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn invalid_urls_are_rejected_without_a_request() {
    let f = fetcher(5);
    assert!(matches!(
        f.fetch_article("not a url").await,
        Err(FetchError::InvalidUrl { .. })
    ));
    assert!(matches!(
        f.fetch_article("ftp://example.com/a").await,
        Err(FetchError::InvalidUrl { .. })
    ));
}
