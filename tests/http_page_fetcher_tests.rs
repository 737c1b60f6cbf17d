use std::time::Duration;

use reviewvault::{FetchOptions, HttpPageFetcher, PageFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REVIEW_PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>Hiroshi Yoshimura: Flora Album Review | Pitchfork</title>
  <link rel="canonical" href="https://pitchfork.com/reviews/albums/hiroshi-yoshimura-flora/">
</head>
<body>
  <nav><p>Reviews</p></nav>
  <article>
    <h1>Flora</h1>
    <p>Hiroshi Yoshimura</p>
    <p>First paragraph of the review.</p>
    <p>Second paragraph of the review.</p>
  </article>
</body>
</html>"#;

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn fetches_article_with_browser_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews/albums/flora/"))
        .and(header("sec-fetch-mode", "navigate"))
        .and(header("referer", "https://pitchfork.com/"))
        .respond_with(html(REVIEW_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/reviews/albums/flora/", server.uri());
    let fetcher = HttpPageFetcher::new().unwrap();
    let page = fetcher.fetch(&url, &FetchOptions::default()).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(
        page.source_url(),
        "https://pitchfork.com/reviews/albums/hiroshi-yoshimura-flora/"
    );
    assert!(page.content_text.contains("First paragraph of the review."));
    assert!(page.content_text.contains("Second paragraph of the review."));
    assert!(!page.content_text.contains("Reviews"));

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.contains("Chrome/122"));
}

#[tokio::test]
async fn page_without_article_is_content_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<html><body><div>Subscribe to read</div></body></html>"))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new().unwrap();
    let err = fetcher
        .fetch(&format!("{}/paywalled", server.uri()), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_content_missing());
}

#[tokio::test]
async fn error_status_is_navigation_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new().unwrap();
    let err = fetcher
        .fetch(&format!("{}/gone", server.uri()), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_navigation());
}

#[tokio::test]
async fn slow_response_hits_navigation_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html(REVIEW_PAGE).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let options = FetchOptions {
        navigation_timeout: Duration::from_millis(50),
        ..FetchOptions::default()
    };
    let fetcher = HttpPageFetcher::new().unwrap();
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()), &options)
        .await
        .unwrap_err();

    assert!(err.is_navigation());
}

#[tokio::test]
async fn custom_selector_is_honoured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html(
            r#"<html><body><main class="review"><p>Only this.</p></main></body></html>"#,
        ))
        .mount(&server)
        .await;

    let options = FetchOptions {
        content_selector: "main.review".to_string(),
        ..FetchOptions::default()
    };
    let fetcher = HttpPageFetcher::new().unwrap();
    let page = fetcher
        .fetch(&format!("{}/custom", server.uri()), &options)
        .await
        .unwrap();

    assert_eq!(page.content_text, "Only this.");
    fetcher.close().await.unwrap();
}

#[tokio::test]
async fn oversized_body_is_content_missing() {
    let server = MockServer::start().await;
    let padding = "<p>filler paragraph</p>".repeat(2_000);

    Mock::given(method("GET"))
        .respond_with(html(&format!(
            "<html><body><article>{}</article></body></html>",
            padding
        )))
        .mount(&server)
        .await;

    let options = FetchOptions {
        max_body_bytes: 4 * 1024,
        ..FetchOptions::default()
    };
    let fetcher = HttpPageFetcher::new().unwrap();
    let err = fetcher
        .fetch(&format!("{}/huge", server.uri()), &options)
        .await
        .unwrap_err();

    assert!(err.is_content_missing());
    assert!(err.to_string().contains("4096"));
}
