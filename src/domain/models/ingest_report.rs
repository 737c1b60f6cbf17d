use super::Review;

/// Step of the per-item pipeline at which an item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestStage {
    Navigate,
    WaitForContent,
    Extract,
    Embed,
    Store,
}

impl IngestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStage::Navigate => "navigate",
            IngestStage::WaitForContent => "wait_for_content",
            IngestStage::Extract => "extract",
            IngestStage::Embed => "embed",
            IngestStage::Store => "store",
        }
    }
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum IngestOutcome {
    Stored {
        url: String,
        review: Review,
    },
    Failed {
        url: String,
        stage: IngestStage,
        reason: String,
    },
}

impl IngestOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, IngestOutcome::Stored { .. })
    }
}

/// Per-URL results of one ingestion run, in input order.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    outcomes: Vec<IngestOutcome>,
}

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: IngestOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_stored()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn stored_reviews(&self) -> impl Iterator<Item = &Review> {
        self.outcomes.iter().filter_map(|o| match o {
            IngestOutcome::Stored { review, .. } => Some(review),
            IngestOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, IngestStage, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            IngestOutcome::Failed { url, stage, reason } => {
                Some((url.as_str(), *stage, reason.as_str()))
            }
            IngestOutcome::Stored { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExtractedReview;

    #[test]
    fn test_report_counts_attempted_and_succeeded_separately() {
        let review = Review::new(ExtractedReview {
            title: "Brat".to_string(),
            artist: "Charli XCX".to_string(),
            score: 9.5,
            review_text: "text".to_string(),
            url: "https://a.test/brat".to_string(),
            date: "2024-06-10".to_string(),
        });

        let mut report = IngestReport::new();
        report.record(IngestOutcome::Stored {
            url: "https://a.test/brat".to_string(),
            review,
        });
        report.record(IngestOutcome::Failed {
            url: "https://a.test/missing".to_string(),
            stage: IngestStage::Navigate,
            reason: "timed out".to_string(),
        });

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.stored_reviews().count(), 1);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures, vec![("https://a.test/missing", IngestStage::Navigate, "timed out")]);
    }
}
