use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::VectorRepository;
use crate::domain::{
    CollectionConfig, CollectionStatus, DomainError, Embedding, Review, ReviewMatch,
};

struct StoredPoint {
    review: Review,
    embedding: Embedding,
}

pub struct InMemoryVectorRepository {
    config: CollectionConfig,
    collection: Arc<Mutex<Option<HashMap<String, StoredPoint>>>>,
}

impl InMemoryVectorRepository {
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            config,
            collection: Arc::new(Mutex::new(None)),
        }
    }

    /// Stored review for `id`, if any.
    pub async fn get(&self, id: &str) -> Option<Review> {
        let collection = self.collection.lock().await;
        collection
            .as_ref()
            .and_then(|points| points.get(id))
            .map(|point| point.review.clone())
    }

    /// Stored vector for `id`, if any.
    pub async fn vector(&self, id: &str) -> Option<Vec<f32>> {
        let collection = self.collection.lock().await;
        collection
            .as_ref()
            .and_then(|points| points.get(id))
            .map(|point| point.embedding.vector().to_vec())
    }

    pub async fn reviews(&self) -> Vec<Review> {
        let collection = self.collection.lock().await;
        collection
            .as_ref()
            .map(|points| points.values().map(|p| p.review.clone()).collect())
            .unwrap_or_default()
    }

    fn missing(&self) -> DomainError {
        DomainError::storage(format!("collection {} does not exist", self.config.name()))
    }
}

impl Default for InMemoryVectorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorRepository for InMemoryVectorRepository {
    async fn ensure_collection(&self) -> Result<CollectionStatus, DomainError> {
        let mut collection = self.collection.lock().await;
        if collection.is_some() {
            return Ok(CollectionStatus::Existing);
        }
        *collection = Some(HashMap::new());
        debug!(
            "Created in-memory collection {} ({} dims, {})",
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

        let mut collection = self.collection.lock().await;
        let points = collection.as_mut().ok_or_else(|| self.missing())?;
        points.insert(
            review.id().to_string(),
            StoredPoint {
                review: review.clone(),
                embedding: embedding.clone(),
            },
        );

        debug!(
            "Upserted review {} into memory ({} dims, {})",
            review.id(),
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

        let collection = self.collection.lock().await;
        let points = collection.as_ref().ok_or_else(|| self.missing())?;

        let mut scored: Vec<ReviewMatch> = points
            .values()
            .map(|point| {
                let score = cosine_similarity(query_embedding, point.embedding.vector());
                ReviewMatch::new(point.review.clone(), score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        Ok(scored)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let collection = self.collection.lock().await;
        let points = collection.as_ref().ok_or_else(|| self.missing())?;
        Ok(points.len() as u64)
    }

    fn config(&self) -> &CollectionConfig {
        &self.config
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
