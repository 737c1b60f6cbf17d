mod http_page_fetcher;
mod in_memory_vector_repository;
mod mock_embedding;
mod openai_embedding;
mod openai_review_extractor;
mod qdrant_vector_repository;

pub use http_page_fetcher::*;
pub use in_memory_vector_repository::*;
pub use mock_embedding::*;
pub use openai_embedding::*;
pub use openai_review_extractor::*;
pub use qdrant_vector_repository::*;
