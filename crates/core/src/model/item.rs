use serde::{Deserialize, Serialize};

use crate::model::ids::WordId;

/// A single French↔Dutch vocabulary pair.
///
/// Items are produced by the scoring service and are immutable for the
/// lifetime of the batch they arrived in. The service may attach extra
/// bookkeeping fields to each item; they are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    pub id: WordId,
    pub fr: String,
    pub nl: String,
}

impl VocabItem {
    #[must_use]
    pub fn new(id: WordId, fr: impl Into<String>, nl: impl Into<String>) -> Self {
        Self {
            id,
            fr: fr.into(),
            nl: nl.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_extra_server_fields() {
        let json = r#"{
            "id": 7,
            "fr": "chat",
            "nl": "kat",
            "bucket": "Unknown",
            "correct_count": 0,
            "total_tests": 0
        }"#;
        let item: VocabItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, WordId::new(7));
        assert_eq!(item.fr, "chat");
        assert_eq!(item.nl, "kat");
    }
}
