use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ReviewExtractor;
use crate::domain::{DomainError, ExtractedReview, ExtractionRequest, FetchedPage};

pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const SYSTEM_PROMPT: &str = "\
You extract structured data from web pages. Answer only with JSON that matches \
the provided schema. Copy text from the page verbatim; never paraphrase, shorten, \
or summarize it. Use an empty string for a text field the page does not contain.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// [`ReviewExtractor`] backed by an OpenAI-compatible chat-completions
/// endpoint with JSON-schema structured output.
///
/// The page's content text, the instruction, and the schema go out in one
/// request; the assistant message must parse as [`ExtractedReview`] or the
/// item fails.
pub struct OpenAiReviewExtractor {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OpenAiReviewExtractor {
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let model = model.into();
        if api_key.trim().is_empty() {
            return Err(DomainError::config("missing OpenAI API key"));
        }
        if model.trim().is_empty() {
            return Err(DomainError::config("missing OpenAI extraction model name"));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| DomainError::config("invalid OpenAI API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::config(format!("Failed to build OpenAI client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
        })
    }

    fn user_prompt(page: &FetchedPage, request: &ExtractionRequest) -> String {
        let mut prompt = String::new();
        prompt.push_str(request.instruction());
        prompt.push_str("\n\nPage URL: ");
        prompt.push_str(page.source_url());
        if let Some(title) = &page.title {
            prompt.push_str("\nPage title: ");
            prompt.push_str(title);
        }
        prompt.push_str("\n\nPage content:\n");
        prompt.push_str(&page.content_text);
        prompt
    }
}

#[async_trait]
impl ReviewExtractor for OpenAiReviewExtractor {
    async fn extract(
        &self,
        page: &FetchedPage,
        request: &ExtractionRequest,
    ) -> Result<ExtractedReview, DomainError> {
        let user = Self::user_prompt(page, request);
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema_name(),
                    strict: true,
                    schema: request.schema(),
                },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::extraction(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("OpenAI chat completions returned {}: {}", status, text);
            return Err(DomainError::extraction(format!(
                "OpenAI extraction request failed ({})",
                status
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            DomainError::extraction(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| DomainError::extraction("OpenAI returned no choices"))?;

        if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
            return Err(DomainError::extraction(format!("Extraction refused: {}", refusal)));
        }

        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| DomainError::extraction("OpenAI returned an empty message"))?;

        let review: ExtractedReview = serde_json::from_str(&content).map_err(|e| {
            DomainError::extraction(format!("Extraction did not match the review schema: {}", e))
        })?;

        debug!(
            "Extracted \"{}\" by {} ({} chars of review text)",
            review.title,
            review.artist,
            review.review_text.len()
        );
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_carries_instruction_and_full_content() {
        let page = FetchedPage::new("https://a.test/x", "Paragraph one.\n\nParagraph two.")
            .with_canonical_url("https://a.test/canonical")
            .with_title("Some Album");
        let request = ExtractionRequest::album_review();

        let prompt = OpenAiReviewExtractor::user_prompt(&page, &request);

        assert!(prompt.starts_with(request.instruction()));
        assert!(prompt.contains("Page URL: https://a.test/canonical"));
        assert!(prompt.contains("Page title: Some Album"));
        assert!(prompt.ends_with("Paragraph one.\n\nParagraph two."));
    }

    #[test]
    fn test_rejects_missing_key() {
        let result = OpenAiReviewExtractor::new(" ", "https://api.openai.com/v1", "gpt-4o-mini");
        assert!(matches!(result, Err(DomainError::Config(_))));
    }
}
