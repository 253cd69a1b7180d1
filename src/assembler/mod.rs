//! Retrieved-context assembly.
//!
//! Turns a raw similarity-search result list into a single context
//! block for the downstream generator: duplicates dropped, hits ordered
//! by relevance, per-hit and total caps enforced, each surviving hit
//! prefixed with a source header. The whole operation is a pure
//! function over its inputs; the seen-id and seen-fingerprint sets are
//! created fresh per call, so concurrent pipeline instances never race.

pub mod fingerprint;

use rustc_hash::FxHashSet;

use crate::types::{AssembledContext, AssemblyConfig, RetrievalHit};
use self::fingerprint::fingerprint as text_fingerprint;

/// Header line that opens every non-empty context block.
const CONTEXT_HEADER: &str = "Retrieved context from archive documents:\n";

/// Assemble retrieval hits into a formatted context block.
///
/// The input is not assumed to arrive sorted or deduplicated; whatever
/// the index structure returned is re-sorted and re-deduplicated here.
/// An empty hit list yields an empty context with zero count, not an
/// error.
pub fn assemble(hits: &[RetrievalHit], config: &AssemblyConfig) -> AssembledContext {
    let mut seen_ids: FxHashSet<&str> = FxHashSet::default();
    let mut seen_fingerprints: FxHashSet<u64> = FxHashSet::default();

    // Dedup by identity first, then by normalized content; first
    // occurrence in input order wins both times.
    let mut survivors: Vec<&RetrievalHit> = Vec::new();
    for hit in hits {
        if !seen_ids.insert(hit.stable_id.as_str()) {
            continue;
        }
        if !seen_fingerprints.insert(text_fingerprint(&hit.text)) {
            continue;
        }
        survivors.push(hit);
    }

    // Stable sort: equal distances keep input order, so the result is
    // deterministic. total_cmp keeps the ordering total even for NaN.
    survivors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    survivors.truncate(config.max_total_hits);

    if survivors.is_empty() {
        return AssembledContext::default();
    }

    let mut parts = vec![CONTEXT_HEADER.to_string()];
    for (position, hit) in survivors.iter().enumerate() {
        parts.push(source_header(position + 1, hit));
        parts.push(truncate_chars(&hit.text, config.max_chars_per_hit));
    }

    AssembledContext {
        formatted_text: parts.join("\n"),
        included_hit_count: survivors.len(),
    }
}

/// Build the `[Source N]` header exposing a hit's provenance.
fn source_header(position: usize, hit: &RetrievalHit) -> String {
    let mission = clean_label(metadata_or_unknown(hit, "mission"));
    let source = metadata_or_unknown(hit, "source");
    let category = clean_label(metadata_or_unknown(hit, "document_category"));
    // Display aid only; distances above 1 clamp to zero relevance.
    let relevance = (1.0 - hit.distance).clamp(0.0, 1.0);
    format!(
        "\n[Source {}] Mission: {} | Document: {} | Category: {} | Relevance: {:.2}",
        position, mission, source, category, relevance
    )
}

fn metadata_or_unknown<'a>(hit: &'a RetrievalHit, key: &str) -> &'a str {
    hit.metadata.get(key).map(String::as_str).unwrap_or("unknown")
}

/// Turn a metadata label like "apollo_11" into "Apollo 11".
fn clean_label(label: &str) -> String {
    label
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut text to at most `max_chars` characters, mid-word if necessary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
