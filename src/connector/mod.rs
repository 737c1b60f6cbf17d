//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Page fetching (HTTP with browser headers, HTML content location)
//! - Structured extraction and embeddings (OpenAI-compatible APIs, mock embeddings)
//! - Storage (Qdrant REST, in-memory)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
