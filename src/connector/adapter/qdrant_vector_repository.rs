use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::VectorRepository;
use crate::domain::{
    CollectionConfig, CollectionStatus, DomainError, Embedding, Review, ReviewMatch,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Qdrant collection adapter speaking the REST API.
///
/// Points are keyed by the review's UUID; the whole `Review` is stored as the
/// payload so search hits can be turned back into records without a second
/// lookup.
pub struct QdrantVectorRepository {
    client: reqwest::Client,
    base_url: String,
    config: CollectionConfig,
}

impl QdrantVectorRepository {
    pub fn new(
        url: &str,
        api_key: Option<&str>,
        config: CollectionConfig,
    ) -> Result<Self, DomainError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DomainError::config(format!(
                "Qdrant URL must be an http(s) URL, got {:?}",
                url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            headers.insert(
                "api-key",
                HeaderValue::from_str(key)
                    .map_err(|_| DomainError::config("invalid Qdrant API key"))?,
            );
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::config(format!("Failed to build Qdrant client: {}", e)))?;

        debug!("Using Qdrant at {} collection {}", url, config.name());

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            config,
        })
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.config.name(), suffix)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to {}: {}", action, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|r| r.status.error)
                .unwrap_or(body);
            return Err(DomainError::storage(format!(
                "Failed to {} ({}): {}",
                action, status, detail
            )));
        }

        let parsed: QdrantResponse<T> = response.json().await.map_err(|e| {
            DomainError::storage(format!("Failed to parse Qdrant response to {}: {}", action, e))
        })?;
        Ok(parsed.result)
    }

    async fn collection_exists(&self) -> Result<bool, DomainError> {
        let list: CollectionList = self
            .send(
                self.client.get(format!("{}/collections", self.base_url)),
                "list collections",
            )
            .await?;
        Ok(list
            .collections
            .iter()
            .any(|collection| collection.name == self.config.name()))
    }
}

#[async_trait]
impl VectorRepository for QdrantVectorRepository {
    async fn ensure_collection(&self) -> Result<CollectionStatus, DomainError> {
        if self.collection_exists().await? {
            debug!("Collection {} already exists", self.config.name());
            return Ok(CollectionStatus::Existing);
        }

        let body = CreateCollection {
            vectors: VectorParams {
                size: self.config.vector_size(),
                distance: self.config.distance(),
            },
        };
        let _: bool = self
            .send(
                self.client.put(self.collection_url("")).json(&body),
                "create collection",
            )
            .await?;

        debug!(
            "Created collection {} ({} dims, {})",
            self.config.name(),
            self.config.vector_size(),
            self.config.distance()
        );
        Ok(CollectionStatus::Created)
    }

    async fn upsert(&self, review: &Review, embedding: &Embedding) -> Result<(), DomainError> {
        if embedding.review_id() != review.id() {
            return Err(DomainError::invalid_input(format!(
                "embedding for {} cannot be stored under review {}",
                embedding.review_id(),
                review.id()
            )));
        }
        self.config.check_vector(embedding.vector())?;

        let body = UpsertPoints {
            points: vec![PointStruct {
                id: review.id(),
                vector: embedding.vector(),
                payload: review,
            }],
        };
        let _: serde_json::Value = self
            .send(
                self.client
                    .put(self.collection_url("/points"))
                    .query(&[("wait", "true")])
                    .json(&body),
                "upsert point",
            )
            .await?;

        debug!(
            "Upserted review {} into {} ({} dims, {})",
            review.id(),
            self.config.name(),
            embedding.dimensions(),
            embedding.model()
        );
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ReviewMatch>, DomainError> {
        self.config.check_vector(query_embedding)?;

        let body = SearchPoints {
            vector: query_embedding,
            limit,
            with_payload: true,
        };
        let hits: Vec<ScoredPoint> = self
            .send(
                self.client
                    .post(self.collection_url("/points/search"))
                    .json(&body),
                "search points",
            )
            .await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let payload = match hit.payload {
                Some(payload) => payload,
                None => continue,
            };
            match serde_json::from_value::<Review>(payload) {
                Ok(review) => results.push(ReviewMatch::new(review, hit.score)),
                Err(e) => warn!("Skipping point {} with unreadable payload: {}", hit.id, e),
            }
        }

        Ok(results)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let result: CountResult = self
            .send(
                self.client
                    .post(self.collection_url("/points/count"))
                    .json(&serde_json::json!({ "exact": true })),
                "count points",
            )
            .await?;
        Ok(result.count)
    }

    fn config(&self) -> &CollectionConfig {
        &self.config
    }
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct ErrorResponse {
    status: ErrorStatus,
}

#[derive(Deserialize)]
struct ErrorStatus {
    error: Option<String>,
}

#[derive(Deserialize)]
struct CollectionList {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Serialize)]
struct CreateCollection<'a> {
    vectors: VectorParams<'a>,
}

#[derive(Serialize)]
struct VectorParams<'a> {
    size: usize,
    distance: &'a str,
}

#[derive(Serialize)]
struct UpsertPoints<'a> {
    points: Vec<PointStruct<'a>>,
}

#[derive(Serialize)]
struct PointStruct<'a> {
    id: &'a str,
    vector: &'a [f32],
    payload: &'a Review,
}

#[derive(Serialize)]
struct SearchPoints<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: serde_json::Value,
    score: f32,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CountResult {
    count: u64,
}
