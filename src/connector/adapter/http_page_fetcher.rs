use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::application::PageFetcher;
use crate::domain::{DomainError, FetchOptions, FetchedPage};

/// Headers of a desktop Chrome on macOS, sent with every page request.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "user-agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    ),
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("accept-encoding", "gzip, deflate, br"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("cache-control", "max-age=0"),
    (
        "sec-ch-ua",
        "\"Chromium\";v=\"122\", \"Not(A:Brand\";v=\"24\", \"Google Chrome\";v=\"122\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
    ("dnt", "1"),
    ("pragma", "no-cache"),
    ("referer", "https://pitchfork.com/"),
];

/// Block-level elements whose text becomes one paragraph of `content_text`.
const TEXT_BLOCKS: &str = "p, h1, h2, h3, h4, h5, h6, li, blockquote, figcaption";

/// Fetches pages over plain HTTP, presenting itself as a desktop browser.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, DomainError> {
        let mut headers = HeaderMap::new();
        for &(name, value) in BROWSER_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read_body(
        response: reqwest::Response,
        url: &str,
        max_bytes: usize,
    ) -> Result<String, DomainError> {
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                DomainError::navigation(format!("Failed to read body of {}: {}", url, e))
            })?;
            if body.len() + chunk.len() > max_bytes {
                return Err(DomainError::content_missing(format!(
                    "Body of {} exceeds {} bytes",
                    url, max_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchedPage, DomainError> {
        let response = tokio::time::timeout(options.navigation_timeout, self.client.get(url).send())
            .await
            .map_err(|_| {
                DomainError::navigation(format!(
                    "Timed out after {}ms loading {}",
                    options.navigation_timeout.as_millis(),
                    url
                ))
            })?
            .map_err(|e| DomainError::navigation(format!("Failed to load {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::navigation(format!(
                "{} returned {}",
                url, status
            )));
        }

        let final_url = response.url().to_string();
        debug!("Loaded {} ({})", final_url, status);

        let body = Self::read_body(response, url, options.max_body_bytes);
        let html = tokio::time::timeout(options.selector_timeout, body)
            .await
            .map_err(|_| {
                DomainError::content_missing(format!(
                    "Timed out after {}ms waiting for `{}` on {}",
                    options.selector_timeout.as_millis(),
                    options.content_selector,
                    url
                ))
            })??;

        parse_page(&final_url, &html, &options.content_selector)
    }

    async fn close(&self) -> Result<(), DomainError> {
        debug!("Closing HTTP page fetcher");
        Ok(())
    }
}

/// Locates the content element and flattens it to paragraph-separated text.
pub fn parse_page(url: &str, html: &str, content_selector: &str) -> Result<FetchedPage, DomainError> {
    let selector = Selector::parse(content_selector).map_err(|e| {
        DomainError::invalid_input(format!("Invalid content selector `{}`: {}", content_selector, e))
    })?;

    let document = Html::parse_document(html);
    let content = document.select(&selector).next().ok_or_else(|| {
        DomainError::content_missing(format!("No `{}` element on {}", content_selector, url))
    })?;

    let content_text = flatten_text(content);
    if content_text.is_empty() {
        return Err(DomainError::content_missing(format!(
            "`{}` element on {} has no text",
            content_selector, url
        )));
    }

    let mut page = FetchedPage::new(url, content_text);

    let canonical = Selector::parse(r#"link[rel="canonical"]"#).expect("canonical selector");
    if let Some(href) = document
        .select(&canonical)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
    {
        page = page.with_canonical_url(href);
    }

    let title = Selector::parse("title").expect("title selector");
    if let Some(text) = document
        .select(&title)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
    {
        page = page.with_title(text);
    }

    Ok(page)
}

fn flatten_text(element: ElementRef<'_>) -> String {
    let blocks = Selector::parse(TEXT_BLOCKS).expect("text block selector");

    // Nested blocks (a <p> inside an <li>) would otherwise be emitted twice.
    let paragraphs: Vec<String> = element
        .select(&blocks)
        .filter(|block| {
            !block
                .ancestors()
                .filter_map(ElementRef::wrap)
                .take_while(|ancestor| ancestor.id() != element.id())
                .any(|ancestor| blocks.matches(&ancestor))
        })
        .map(|block| collapse_whitespace(&block.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        return collapse_whitespace(&element.text().collect::<String>());
    }
    paragraphs.join("\n\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
