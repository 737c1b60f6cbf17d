use async_trait::async_trait;

use crate::domain::{DomainError, FetchOptions, FetchedPage};

/// Loads a page and waits for its content element.
///
/// Implementations report a failed or timed-out load as
/// [`DomainError::Navigation`] and a missing content element as
/// [`DomainError::ContentMissing`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<FetchedPage, DomainError>;

    /// Releases the underlying session.
    async fn close(&self) -> Result<(), DomainError>;
}
