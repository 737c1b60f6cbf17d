use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An album review as stored in the vector collection.
///
/// `id` is the storage key; the remaining fields are copied verbatim from
/// what the extraction service returned for the source page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub score: f64,
    pub review_text: String,
    pub url: String,
    pub date: String,
}

impl Review {
    /// Builds a record with a freshly generated id.
    pub fn new(extracted: ExtractedReview) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), extracted)
    }

    pub fn with_id(id: impl Into<String>, extracted: ExtractedReview) -> Self {
        Self {
            id: id.into(),
            title: extracted.title,
            artist: extracted.artist,
            score: extracted.score,
            review_text: extracted.review_text,
            url: extracted.url,
            date: extracted.date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn review_text(&self) -> &str {
        &self.review_text
    }

    pub fn headline(&self) -> String {
        format!("{} by {} (Score: {})", self.title, self.artist, self.score)
    }
}

/// Fields the extraction service must return for a review page.
///
/// The JSON schema derived from this type is sent with every extraction
/// request, so the doc comments below double as field descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExtractedReview {
    /// Album title.
    pub title: String,
    /// Recording artist.
    pub artist: String,
    /// Numeric rating exactly as printed on the page.
    pub score: f64,
    /// The complete review body, every paragraph, not a summary.
    pub review_text: String,
    /// Address of the review page.
    pub url: String,
    /// Publication date as presented on the page.
    pub date: String,
}

impl ExtractedReview {
    /// JSON schema describing the six extracted fields, in the subset strict
    /// structured output accepts (no `$schema`, no `format` keywords).
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ExtractedReview);
        let mut value = serde_json::to_value(&schema).unwrap_or_default();
        if let Some(object) = value.as_object_mut() {
            object.remove("$schema");
        }
        strip_formats(&mut value);
        value
    }

    /// Falls back to `url` when the extraction left the address blank.
    pub fn with_default_url(mut self, url: &str) -> Self {
        if self.url.trim().is_empty() {
            self.url = url.to_string();
        }
        self
    }
}

fn strip_formats(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(object) => {
            if object.get("format").is_some_and(|f| f.is_string()) {
                object.remove("format");
            }
            object.values_mut().for_each(strip_formats);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_formats),
        _ => {}
    }
}
