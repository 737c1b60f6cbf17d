use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ExtractedReview;

/// Instruction sent with every review extraction. Asking for the complete
/// text matters: a looser wording lets the service return a summary.
pub const REVIEW_EXTRACTION_INSTRUCTION: &str = "Extract the album review details including title, \
artist, score, full review text (including all paragraphs), and date. Make sure to get the \
complete review text, not just a summary.";

pub const DEFAULT_CONTENT_SELECTOR: &str = "article";

/// Largest page body read before giving up on finding the content element.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Natural-language instruction plus the schema the answer must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRequest {
    instruction: String,
    schema_name: String,
    schema: serde_json::Value,
}

impl ExtractionRequest {
    pub fn new(
        instruction: impl Into<String>,
        schema_name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            schema_name: schema_name.into(),
            schema,
        }
    }

    /// The album review contract: fixed instruction and `ExtractedReview` schema.
    pub fn album_review() -> Self {
        Self::new(
            REVIEW_EXTRACTION_INSTRUCTION,
            "album_review",
            ExtractedReview::json_schema(),
        )
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn schema(&self) -> &serde_json::Value {
        &self.schema
    }
}

/// Timeouts and the content selector used when loading a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub navigation_timeout: Duration,
    pub content_selector: String,
    pub selector_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            selector_timeout: Duration::from_secs(10),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// A loaded page, reduced to what extraction needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub canonical_url: Option<String>,
    pub title: Option<String>,
    pub content_text: String,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, content_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            canonical_url: None,
            title: None,
            content_text: content_text.into(),
        }
    }

    pub fn with_canonical_url(mut self, canonical_url: impl Into<String>) -> Self {
        self.canonical_url = Some(canonical_url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Canonical address when the page declares one, else the fetched URL.
    pub fn source_url(&self) -> &str {
        self.canonical_url.as_deref().unwrap_or(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_review_request_demands_complete_text() {
        let request = ExtractionRequest::album_review();
        assert!(request.instruction().contains("complete review text"));
        assert!(request.instruction().contains("not just a summary"));
        assert_eq!(request.schema_name(), "album_review");
        assert!(request.schema()["properties"]["review_text"].is_object());
    }

    #[test]
    fn test_source_url_prefers_canonical() {
        let page = FetchedPage::new("https://a.test/x?utm=1", "body");
        assert_eq!(page.source_url(), "https://a.test/x?utm=1");

        let page = page.with_canonical_url("https://a.test/x");
        assert_eq!(page.source_url(), "https://a.test/x");
    }
}
