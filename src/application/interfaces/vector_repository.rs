use async_trait::async_trait;

use crate::domain::{CollectionConfig, CollectionStatus, DomainError, Embedding, Review, ReviewMatch};

/// Review storage and similarity search operations.
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Creates the collection if it does not exist yet. Safe to call on every run.
    async fn ensure_collection(&self) -> Result<CollectionStatus, DomainError>;

    /// Inserts or replaces the point keyed by `review.id`.
    async fn upsert(&self, review: &Review, embedding: &Embedding) -> Result<(), DomainError>;

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ReviewMatch>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    fn config(&self) -> &CollectionConfig;
}
