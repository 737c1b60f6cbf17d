mod collection;
mod embedding;
mod extraction;
mod ingest_report;
mod review;
mod search_result;

pub use collection::*;
pub use embedding::*;
pub use extraction::*;
pub use ingest_report::*;
pub use review::*;
pub use search_result::*;
