//! Sentence-aware text chunker.
//!
//! Splits a document into bounded, overlapping passages, preferring to
//! cut just after a sentence terminator found within a backward search
//! window. Chunking is a pure function of its inputs: running it twice
//! over the same document with the same configuration yields an
//! identical sequence of chunks, offsets, and stable ids.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::types::{Chunk, ChunkConfig, Document};

/// Characters that end a sentence for boundary-search purposes.
const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\n'];

/// Lazily chunk a document.
///
/// Validates the configuration before any chunk is produced; an invalid
/// size/overlap combination fails here, never partway through iteration.
/// Empty documents yield an iterator that produces no chunks.
pub fn chunk(document: &Document, config: &ChunkConfig) -> Result<Chunks, ConfigError> {
    config.validate()?;
    Ok(Chunks::new(
        &document.text,
        document.identifier(),
        document.base_metadata(),
        config.clone(),
    ))
}

/// Eagerly chunk a document into a vector.
pub fn chunk_document(document: &Document, config: &ChunkConfig) -> Result<Vec<Chunk>, ConfigError> {
    Ok(chunk(document, config)?.collect())
}

/// Lazily chunk raw text under a caller-supplied document identifier.
///
/// Useful when the text does not come from a [`Document`]; no metadata
/// is attached beyond the stable ids.
pub fn chunk_text(
    text: &str,
    document_id: &str,
    config: &ChunkConfig,
) -> Result<Chunks, ConfigError> {
    config.validate()?;
    Ok(Chunks::new(text, document_id, HashMap::new(), config.clone()))
}

/// Iterator over the chunks of one document.
///
/// Finite and deterministic. The iterator owns a normalized copy of the
/// document text (CRLF and lone CR become LF; nothing else changes), so
/// all offsets refer to the normalized text.
pub struct Chunks {
    chars: Vec<char>,
    config: ChunkConfig,
    document_id: String,
    metadata: HashMap<String, String>,
    start: usize,
    index: usize,
}

impl Chunks {
    fn new(
        text: &str,
        document_id: &str,
        metadata: HashMap<String, String>,
        config: ChunkConfig,
    ) -> Self {
        Self {
            chars: normalize_line_breaks(text),
            config,
            document_id: document_id.to_string(),
            metadata,
            start: 0,
            index: 0,
        }
    }

    /// Search `[floor, candidate_end)` backward for the last sentence
    /// terminator followed by whitespace or end-of-text.
    fn find_sentence_break(&self, floor: usize, candidate_end: usize) -> Option<usize> {
        for pos in (floor..candidate_end).rev() {
            if !SENTENCE_TERMINATORS.contains(&self.chars[pos]) {
                continue;
            }
            let followed_ok = self
                .chars
                .get(pos + 1)
                .map_or(true, |next| next.is_whitespace());
            if followed_ok {
                return Some(pos);
            }
        }
        None
    }
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let len = self.chars.len();
        if self.start >= len {
            return None;
        }

        let start = self.start;
        let candidate_end = (start + self.config.chunk_size).min(len);
        let mut end = candidate_end;

        // Prefer a sentence boundary when we are not already at the end
        // of the document. The search never looks before `start`: a
        // chunk must not borrow characters from before its own window.
        if candidate_end < len && self.config.boundary_search_window > 0 {
            let floor = start.max(candidate_end.saturating_sub(self.config.boundary_search_window));
            if let Some(best_break) = self.find_sentence_break(floor, candidate_end) {
                // Include the terminator itself. A terminator sitting
                // exactly at the window start would make a bare
                // one-character chunk, so it falls back to a hard cut.
                let boundary_end = best_break + 1;
                if best_break > start && boundary_end - start <= self.config.chunk_size {
                    end = boundary_end;
                }
            }
        }

        // Hard cap. Applied unconditionally as the last adjustment
        // before emitting; no chunk may exceed chunk_size even when the
        // boundary search misbehaves.
        if end - start > self.config.chunk_size {
            end = start + self.config.chunk_size;
        }

        let text: String = self.chars[start..end].iter().collect();
        let chunk = Chunk::new(
            &self.document_id,
            self.index,
            text,
            start,
            end,
            self.metadata.clone(),
        );
        self.index += 1;

        if end >= len {
            // Final chunk emitted; backing up for overlap here would
            // only re-emit a tail of it.
            self.start = len;
        } else {
            let next_start = end.saturating_sub(self.config.chunk_overlap);
            // Guarantee forward progress when the overlap swallows the
            // whole chunk.
            self.start = if next_start <= start { end } else { next_start };
        }

        Some(chunk)
    }
}

/// Normalize line breaks to LF without altering any other character.
fn normalize_line_breaks(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}
