mod ingest_reviews;
mod search_reviews;

pub use ingest_reviews::*;
pub use search_reviews::*;
