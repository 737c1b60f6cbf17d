mod embedding_service;
mod ingest_observer;
mod page_fetcher;
mod review_extractor;
mod vector_repository;

pub use embedding_service::*;
pub use ingest_observer::*;
pub use page_fetcher::*;
pub use review_extractor::*;
pub use vector_repository::*;
