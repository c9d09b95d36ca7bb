use super::document::Document;
use serde::{Deserialize, Serialize};

/// One day's journal entry as persisted.
///
/// `content` is the markup form of a [`Document`]; `started_at` is the
/// creation time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "startedAt", default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
}

impl JournalEntry {
    pub fn document(&self) -> Document {
        Document::from_markup(&self.content)
    }

    pub fn is_blank(&self) -> bool {
        self.document().is_blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let entry = JournalEntry {
            date: "2024-01-02".to_string(),
            content: "hello".to_string(),
            started_at: Some(1_704_189_600_000),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-01-02","content":"hello","startedAt":1704189600000}"#
        );
    }

    #[test]
    fn test_missing_started_at_deserializes() {
        let entry: JournalEntry =
            serde_json::from_str(r#"{"date":"2024-01-02","content":""}"#).unwrap();
        assert_eq!(entry.started_at, None);
        assert!(entry.is_blank());
    }
}
