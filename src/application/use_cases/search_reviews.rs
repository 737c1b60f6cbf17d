use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::application::{EmbeddingService, VectorRepository};
use crate::domain::{DomainError, ReviewMatch};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

pub struct SearchReviewsUseCase {
    vector_repo: Arc<dyn VectorRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl SearchReviewsUseCase {
    pub fn new(
        vector_repo: Arc<dyn VectorRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            vector_repo,
            embedding_service,
        }
    }

    /// Returns up to `limit` stored reviews ranked by similarity to `query`.
    pub async fn execute(&self, query: &str, limit: usize) -> Result<Vec<ReviewMatch>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::invalid_input("search query is empty"));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        info!("Searching reviews for: {}", query);
        let start_time = Instant::now();

        let query_embedding = self.embedding_service.embed_text(query).await?;
        let results = self
            .vector_repo
            .search(&query_embedding, limit)
            .await?;

        info!(
            "Found {} results in {:.2}s",
            results.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(results)
    }
}
