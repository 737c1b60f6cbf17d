use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::CollectionConfig;
use crate::{
    EmbeddingService, HttpPageFetcher, InMemoryVectorRepository, IngestReviewsUseCase,
    MockEmbedding, OpenAiEmbedding, OpenAiReviewExtractor, QdrantVectorRepository,
    SearchReviewsUseCase, VectorRepository,
};

pub struct ContainerConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub extraction_model: String,
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    pub collection: String,
    pub mock_embeddings: bool,
    /// Keep points in process memory instead of Qdrant; they are gone on exit.
    pub memory_storage: bool,
}

pub struct Container {
    embedding_service: Arc<dyn EmbeddingService>,
    vector_repo: Arc<dyn VectorRepository>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let embedding_service: Arc<dyn EmbeddingService> = if config.mock_embeddings {
            debug!("Using mock embedding service");
            Arc::new(MockEmbedding::new())
        } else {
            debug!("Using OpenAI embeddings ({})", config.embedding_model);
            Arc::new(OpenAiEmbedding::new(
                config.openai_api_key()?,
                &config.openai_base_url,
                config.embedding_model.clone(),
            )?)
        };

        let collection = CollectionConfig::new(config.collection.clone());
        let vector_repo: Arc<dyn VectorRepository> = if config.memory_storage {
            debug!("Using in-memory vector storage");
            Arc::new(InMemoryVectorRepository::with_config(collection))
        } else {
            let url = config
                .qdrant_url
                .as_deref()
                .context("QDRANT_URL is not set (pass --qdrant-url or --memory-storage)")?;
            Arc::new(QdrantVectorRepository::new(
                url,
                config.qdrant_api_key.as_deref(),
                collection,
            )?)
        };

        Ok(Self {
            embedding_service,
            vector_repo,
            config,
        })
    }

    pub fn ingest_use_case(&self) -> Result<IngestReviewsUseCase> {
        let page_fetcher = Arc::new(HttpPageFetcher::new()?);
        let extractor = Arc::new(OpenAiReviewExtractor::new(
            self.config.openai_api_key()?,
            &self.config.openai_base_url,
            self.config.extraction_model.clone(),
        )?);

        Ok(IngestReviewsUseCase::new(
            self.vector_repo.clone(),
            page_fetcher,
            extractor,
            self.embedding_service.clone(),
        ))
    }

    pub fn search_use_case(&self) -> SearchReviewsUseCase {
        SearchReviewsUseCase::new(self.vector_repo.clone(), self.embedding_service.clone())
    }

    pub fn vector_repo(&self) -> Arc<dyn VectorRepository> {
        self.vector_repo.clone()
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    pub fn qdrant_url(&self) -> Option<&str> {
        self.config.qdrant_url.as_deref()
    }
}

impl ContainerConfig {
    fn openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY is not set")
    }
}
