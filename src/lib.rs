pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    EmbeddingService, IngestObserver, IngestReviewsUseCase, PageFetcher, ReviewExtractor,
    SearchReviewsUseCase, VectorRepository,
};

pub use connector::{
    HttpPageFetcher, InMemoryVectorRepository, MockEmbedding, OpenAiEmbedding,
    OpenAiReviewExtractor, QdrantVectorRepository,
};

pub use domain::{
    CollectionConfig, CollectionStatus, DomainError, Embedding, EmbeddingConfig, ExtractedReview,
    ExtractionRequest, FetchOptions, FetchedPage, IngestOutcome, IngestReport, IngestStage, Review,
    ReviewMatch,
};
