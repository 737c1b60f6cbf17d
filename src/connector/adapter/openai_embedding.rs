use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig, REVIEW_VECTOR_SIZE};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Embeddings client for OpenAI-compatible `/embeddings` endpoints.
///
/// One request per text, no retries: a failed call fails the item.
pub struct OpenAiEmbedding {
    client: reqwest::Client,
    endpoint: String,
    config: EmbeddingConfig,
}

impl OpenAiEmbedding {
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
            return Err(DomainError::config("missing OpenAI embedding model name"));
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
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            config: EmbeddingConfig::new(model, REVIEW_VECTOR_SIZE),
        })
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::embedding("cannot embed empty text"));
        }

        let request = EmbeddingRequest {
            model: self.config.model_name(),
            input: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::embedding(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI embeddings returned {}: {}", status, body);
            return Err(DomainError::embedding(format!(
                "OpenAI embeddings request failed ({})",
                status
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            DomainError::embedding(format!("Failed to parse OpenAI embedding response: {}", e))
        })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| DomainError::embedding("OpenAI returned no embeddings"))?;

        debug!(
            "Embedded {} chars with {} into {} dimensions",
            text.len(),
            self.config.model_name(),
            vector.len()
        );
        Ok(vector)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
