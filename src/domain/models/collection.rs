use serde::{Deserialize, Serialize};

use super::REVIEW_VECTOR_SIZE;
use crate::domain::DomainError;

pub const DEFAULT_COLLECTION_NAME: &str = "music_reviews";

/// Distance metric every review collection is created with.
pub const COLLECTION_DISTANCE: &str = "Cosine";

/// Name and vector layout of the review collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    name: String,
    vector_size: usize,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vector_size: REVIEW_VECTOR_SIZE,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn distance(&self) -> &'static str {
        COLLECTION_DISTANCE
    }

    /// Rejects vectors that do not match the collection's dimensionality.
    pub fn check_vector(&self, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != self.vector_size {
            return Err(DomainError::invalid_input(format!(
                "vector has {} dimensions, collection {} expects {}",
                vector.len(),
                self.name,
                self.vector_size
            )));
        }
        Ok(())
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION_NAME)
    }
}

/// Outcome of making sure the collection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Created,
    Existing,
}
