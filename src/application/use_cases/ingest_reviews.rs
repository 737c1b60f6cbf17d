use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::application::{
    EmbeddingService, IngestObserver, PageFetcher, ReviewExtractor, VectorRepository,
};
use crate::domain::{
    CollectionStatus, DomainError, Embedding, ExtractionRequest, FetchOptions, IngestOutcome,
    IngestReport, IngestStage, Review,
};

/// Courtesy pause before each page load.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

pub struct IngestReviewsUseCase {
    vector_repo: Arc<dyn VectorRepository>,
    page_fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ReviewExtractor>,
    embedding_service: Arc<dyn EmbeddingService>,
    request: ExtractionRequest,
    fetch_options: FetchOptions,
    request_delay: Duration,
    observer: Option<Arc<dyn IngestObserver>>,
}

impl IngestReviewsUseCase {
    pub fn new(
        vector_repo: Arc<dyn VectorRepository>,
        page_fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn ReviewExtractor>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            vector_repo,
            page_fetcher,
            extractor,
            embedding_service,
            request: ExtractionRequest::album_review(),
            fetch_options: FetchOptions::default(),
            request_delay: DEFAULT_REQUEST_DELAY,
            observer: None,
        }
    }

    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch_options = options;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn IngestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runs the pipeline over `urls` in order.
    ///
    /// Only a failure to set up the collection is returned as an error; every
    /// per-item failure is recorded in the report and the loop moves on.
    pub async fn execute(&self, urls: &[String]) -> Result<IngestReport, DomainError> {
        let collection = self.vector_repo.config().name().to_string();
        match self.vector_repo.ensure_collection().await {
            Ok(CollectionStatus::Created) => info!("Created collection: {}", collection),
            Ok(CollectionStatus::Existing) => info!("Collection {} already exists", collection),
            Err(e) => {
                error!("Error initializing collection {}: {}", collection, e);
                return Err(e);
            }
        }

        let start_time = Instant::now();
        let mut report = IngestReport::new();

        for url in urls {
            info!("Processing review: {}", url);
            if let Some(observer) = &self.observer {
                observer.item_started(url);
            }

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let outcome = match self.process(url).await {
                Ok(review) => {
                    info!("Added review: {} by {}", review.title, review.artist);
                    IngestOutcome::Stored {
                        url: url.clone(),
                        review,
                    }
                }
                Err((stage, e)) => {
                    error!("Failed to process review at {} ({}): {}", url, stage, e);
                    IngestOutcome::Failed {
                        url: url.clone(),
                        stage,
                        reason: e.to_string(),
                    }
                }
            };

            if let Some(observer) = &self.observer {
                observer.item_finished(&outcome);
            }
            report.record(outcome);
        }

        if let Err(e) = self.page_fetcher.close().await {
            warn!("Failed to close page fetcher: {}", e);
        }

        info!(
            "Ingestion complete: {} attempted, {} stored, {} failed in {:.2}s",
            report.attempted(),
            report.succeeded(),
            report.failed(),
            start_time.elapsed().as_secs_f64()
        );

        if let Some(observer) = &self.observer {
            observer.run_finished(&report);
        }

        Ok(report)
    }

    async fn process(&self, url: &str) -> Result<Review, (IngestStage, DomainError)> {
        let page = self
            .page_fetcher
            .fetch(url, &self.fetch_options)
            .await
            .map_err(|e| {
                let stage = if e.is_content_missing() {
                    IngestStage::WaitForContent
                } else {
                    IngestStage::Navigate
                };
                (stage, e)
            })?;
        debug!("Loaded {} ({} chars of content)", url, page.content_text.len());

        let extracted = self
            .extractor
            .extract(&page, &self.request)
            .await
            .map_err(|e| (IngestStage::Extract, e))?
            .with_default_url(page.source_url());

        let review = Review::new(extracted);

        let vector = self
            .embedding_service
            .embed_text(review.review_text())
            .await
            .map_err(|e| (IngestStage::Embed, e))?;
        self.vector_repo
            .config()
            .check_vector(&vector)
            .map_err(|e| (IngestStage::Embed, e))?;

        let embedding = Embedding::new(
            review.id().to_string(),
            vector,
            self.embedding_service.config().model_name().to_string(),
        );

        self.vector_repo
            .upsert(&review, &embedding)
            .await
            .map_err(|e| (IngestStage::Store, e))?;

        Ok(review)
    }
}
