//! Document type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A plain-text document to be chunked and indexed.
///
/// The text is expected to be already-decoded Unicode; encoding repair
/// for legacy byte sequences happens upstream, before a document is
/// constructed. Documents are immutable once read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The raw document text
    pub text: String,

    /// Source path or identifier, unique within the corpus
    pub source: String,

    /// Mission or collection label (free-form, attached as metadata)
    pub mission: String,

    /// Document category label (e.g. "transcript", "report")
    pub category: String,
}

impl Document {
    /// Create a new document.
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        mission: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            mission: mission.into(),
            category: category.into(),
        }
    }

    /// The identifier chunk stable ids are derived from.
    pub fn identifier(&self) -> &str {
        &self.source
    }

    /// Metadata attached to every chunk produced from this document.
    pub fn base_metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("mission".to_string(), self.mission.clone()),
            ("source".to_string(), self.source.clone()),
            ("document_category".to_string(), self.category.clone()),
        ])
    }

    /// Document length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the document has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
