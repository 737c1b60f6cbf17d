use async_trait::async_trait;

use crate::domain::{DomainError, ExtractedReview, ExtractionRequest, FetchedPage};

/// Turns a loaded page into structured review fields.
#[async_trait]
pub trait ReviewExtractor: Send + Sync {
    async fn extract(
        &self,
        page: &FetchedPage,
        request: &ExtractionRequest,
    ) -> Result<ExtractedReview, DomainError>;
}
