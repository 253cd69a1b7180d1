//! Retrieval result and assembled context types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A candidate passage returned by the external similarity search.
///
/// Hits are read-only inputs to the assembler; the core neither produces
/// nor persists them. The assembler re-sorts and re-deduplicates
/// defensively, so the input list does not need to arrive sorted or
/// deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalHit {
    /// The passage text
    pub text: String,

    /// Stable chunk id this passage was indexed under
    pub stable_id: String,

    /// Similarity-search distance: 0 = identical, larger = less similar.
    /// Depending on the metric this can exceed 1.
    pub distance: f32,

    /// Source metadata stored alongside the passage
    pub metadata: HashMap<String, String>,
}

impl RetrievalHit {
    /// Create a hit with empty metadata.
    pub fn new(text: impl Into<String>, stable_id: impl Into<String>, distance: f32) -> Self {
        Self {
            text: text.into(),
            stable_id: stable_id.into(),
            distance,
            metadata: HashMap::new(),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A formatted context block ready for the downstream generator.
///
/// Derived and recomputed per query; never cached. An empty hit list
/// yields an empty-but-valid context, which callers must treat as a
/// representable "no context" state rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The concatenated, header-annotated context text
    pub formatted_text: String,

    /// Number of hits actually included after dedup and capping
    pub included_hit_count: usize,
}

impl AssembledContext {
    /// Check whether any hits made it into the context.
    pub fn is_empty(&self) -> bool {
        self.included_hit_count == 0
    }
}
