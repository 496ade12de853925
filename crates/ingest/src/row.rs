use extract::{Outcome, Tag};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::level::Level;

/// One output record of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub doc_id: String,
    pub row_id: String,
    pub level: Level,
    /// Smallest segment ordinal covered by the row; `None` at document level
    pub position: Option<u32>,
    /// Set when every segment of the row carries the same tag
    pub tag: Option<Tag>,
    pub tags: Option<Vec<Tag>>,
    pub segment_count: u32,
    pub text: String,
    /// Text of the row's segments, grouped per tag
    pub tag_texts: BTreeMap<Tag, String>,
    pub outcome: Outcome,
    pub label: bool,
}

/// Everything that distinguishes rows of the same document.
pub struct RowContent {
    pub position: Option<u32>,
    pub tag: Option<Tag>,
    pub tags: Option<Vec<Tag>>,
    pub segment_count: u32,
    pub text: String,
    pub tag_texts: BTreeMap<Tag, String>,
}

impl Row {
    pub fn new(doc_id: String, level: Level, outcome: Outcome, content: RowContent) -> Self {
        // Generate stable row_id from content
        let row_id = Self::generate_row_id(&doc_id, level, content.position, &content.text);

        Self {
            doc_id,
            row_id,
            level,
            position: content.position,
            tag: content.tag,
            tags: content.tags,
            segment_count: content.segment_count,
            text: content.text,
            tag_texts: content.tag_texts,
            outcome,
            label: outcome.label(),
        }
    }

    fn generate_row_id(doc_id: &str, level: Level, position: Option<u32>, text: &str) -> String {
        let mut hasher = Sha256::new();
        // Length-prefix every field so adjacent fields cannot trade bytes
        for field in [doc_id.as_bytes(), level.as_str().as_bytes()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        match position {
            Some(position) => {
                hasher.update([1u8]);
                hasher.update(position.to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
        hasher.update((text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16]) // Use first 16 bytes (32 hex chars)
    }

    pub fn tag_text(&self, tag: Tag) -> Option<&str> {
        self.tag_texts.get(&tag).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(position: Option<u32>, text: &str) -> RowContent {
        RowContent {
            position,
            tag: Some(Tag::Mot),
            tags: Some(vec![Tag::Mot]),
            segment_count: 1,
            text: text.to_string(),
            tag_texts: BTreeMap::from([(Tag::Mot, text.to_string())]),
        }
    }

    fn segment_row(doc_id: &str, outcome: Outcome, content: RowContent) -> Row {
        Row::new(doc_id.to_string(), Level::Segment, outcome, content)
    }

    #[test]
    fn test_row_id_is_stable() {
        let a = segment_row("doc", Outcome::Rejected, content(Some(3), "motivo"));
        let b = segment_row("doc", Outcome::Rejected, content(Some(3), "motivo"));
        let c = segment_row("doc", Outcome::Rejected, content(Some(4), "motivo"));

        assert_eq!(a.row_id, b.row_id);
        assert_ne!(a.row_id, c.row_id);
        assert_eq!(a.row_id.len(), 32);
    }

    #[test]
    fn test_row_id_fields_do_not_run_together() {
        let first = segment_row("doc", Outcome::Rejected, content(Some(1), "2. Il ricorso"));
        let second = segment_row("doc", Outcome::Rejected, content(Some(12), ". Il ricorso"));
        assert_ne!(first.row_id, second.row_id);

        let shifted = segment_row("do", Outcome::Rejected, content(None, "cx"));
        let plain = segment_row("doc", Outcome::Rejected, content(None, "x"));
        assert_ne!(shifted.row_id, plain.row_id);
    }

    #[test]
    fn test_label_follows_outcome() {
        let rejected = segment_row("doc", Outcome::Rejected, content(None, "x"));
        let upheld = segment_row("doc", Outcome::Upheld, content(None, "x"));

        assert!(rejected.label);
        assert!(!upheld.label);
        assert_eq!(upheld.tag_text(Tag::Mot), Some("x"));
        assert_eq!(upheld.tag_text(Tag::Dec), None);
    }
}
