//! Chunk type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded contiguous passage of a document prepared for indexing.
///
/// Chunks are the fundamental unit of content that gets embedded and
/// retrieved. Offsets are character offsets into the normalized document
/// text; `[start_offset, end_offset)` ranges of consecutive chunks cover
/// the document without gaps, overlapping by up to the configured
/// overlap. Chunks are created once per chunking pass and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, at most `chunk_size` characters
    pub text: String,

    /// Starting character offset in the document text (inclusive)
    pub start_offset: usize,

    /// Ending character offset in the document text (exclusive)
    pub end_offset: usize,

    /// Zero-based, gapless sequence number within the document
    pub index: usize,

    /// Deterministic identifier derived from the document identifier and
    /// the chunk index, so re-chunking reproduces identical ids
    pub stable_id: String,

    /// Metadata inherited from the source document
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    /// Create a chunk, deriving its stable id from `(document_id, index)`.
    pub fn new(
        document_id: &str,
        index: usize,
        text: String,
        start_offset: usize,
        end_offset: usize,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            stable_id: Self::stable_id_for(document_id, index),
            text,
            start_offset,
            end_offset,
            index,
            metadata,
        }
    }

    /// Compute the stable id for a given document identifier and index.
    ///
    /// Uses a UUIDv5 over `"{document_id}#{index}"` so the id is a pure
    /// function of its inputs. This is what makes skip/update/replace
    /// re-ingestion idempotent.
    pub fn stable_id_for(document_id: &str, index: usize) -> String {
        let name = format!("{}#{}", document_id, index);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    /// Chunk length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
