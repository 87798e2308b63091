//! Row types for documents and stored items.

use serde::{Deserialize, Serialize};

use lectern_core::{ExtractedItem, ItemKind, License};

/// A document row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub license: License,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: i64,
    /// Set each time the item set is replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<i64>,
}

/// An extracted item as persisted for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: i64,
    pub doc_id: i64,
    #[serde(flatten)]
    pub item: ExtractedItem,
}

/// Options for adding a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub author: Option<String>,
    pub license: License,
    pub source_path: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<i64>,
}

impl NewDocument {
    pub fn new(title: impl Into<String>, license: License) -> Self {
        Self {
            title: title.into(),
            author: None,
            license,
            source_path: None,
            metadata: None,
            created_at: None,
        }
    }
}

/// Per-type item tallies for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCounts {
    pub quote: i64,
    pub verse: i64,
    pub code: i64,
}

impl ItemCounts {
    pub fn total(&self) -> i64 {
        self.quote + self.verse + self.code
    }

    pub(crate) fn add(&mut self, kind: ItemKind, count: i64) {
        match kind {
            ItemKind::Quote => self.quote += count,
            ItemKind::Verse => self.verse += count,
            ItemKind::Code => self.code += count,
        }
    }
}
