use serde::{Deserialize, Serialize};

use super::Review;

/// A stored review returned by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewMatch {
    review: Review,
    score: f32,
}

impl ReviewMatch {
    pub fn new(review: Review, score: f32) -> Self {
        Self { review, score }
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}
