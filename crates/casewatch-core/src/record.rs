//! Case record domain model.

use serde::{Deserialize, Serialize};

/// Sentinel date used when the feed omits a publication date.
pub const UNKNOWN_DATE: &str = "Unknown";

/// One feed entry normalized to title, link, and date.
///
/// The `link` is the canonical document URL and serves as the unique
/// identity key for de-duplication. The `date` is an opaque string taken
/// verbatim from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Display title of the case.
    pub title: String,
    /// Canonical URL; identity key.
    pub link: String,
    /// Publication date, or [`UNKNOWN_DATE`] when absent.
    pub date: String,
}

impl CaseRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            date: date.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_object() {
        let record = CaseRecord::new(
            "Smith v Jones",
            "https://caselaw.example.org/id/1",
            "2026-01-05",
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Smith v Jones",
                "link": "https://caselaw.example.org/id/1",
                "date": "2026-01-05",
            })
        );
    }

    #[test]
    fn deserializes_snapshot_array() {
        let json = r#"[{"title":"A","link":"https://x/a","date":"Unknown"}]"#;
        let records: Vec<CaseRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records, vec![CaseRecord::new("A", "https://x/a", "Unknown")]);
    }
}
