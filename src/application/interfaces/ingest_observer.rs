use crate::domain::{IngestOutcome, IngestReport};

/// Receives progress events from an ingestion run.
///
/// Every method has an empty default, so implementations only override what
/// they present.
pub trait IngestObserver: Send + Sync {
    fn item_started(&self, _url: &str) {}

    fn item_finished(&self, _outcome: &IngestOutcome) {}

    fn run_finished(&self, _report: &IngestReport) {}
}
