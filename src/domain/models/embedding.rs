use serde::{Deserialize, Serialize};

/// Dimensionality of `text-embedding-3-small` and of the review collection.
pub const REVIEW_VECTOR_SIZE: usize = 1536;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Represents a vector embedding for a review's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    review_id: String,
    vector: Vec<f32>,
    model: String,
}

impl Embedding {
    pub fn new(review_id: String, vector: Vec<f32>, model: String) -> Self {
        Self {
            review_id,
            vector,
            model,
        }
    }

    pub fn review_id(&self) -> &str {
        &self.review_id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// Configuration for the embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    model_name: String,
    dimensions: usize,
}

impl EmbeddingConfig {
    pub fn new(model_name: String, dimensions: usize) -> Self {
        Self {
            model_name,
            dimensions,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
