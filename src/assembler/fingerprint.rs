//! Normalized-text fingerprints for near-duplicate detection.
//!
//! Overlapping chunks retrieved independently often carry identical or
//! near-identical text under distinct stable ids. The fingerprint is a
//! collision-tolerant heuristic, not an exact comparison: lowercase the
//! text, replace punctuation with spaces, collapse whitespace runs, and
//! hash the result with a fast non-cryptographic hasher. Digits are
//! retained; mission transcripts are full of timestamps and callsign
//! numbers that distinguish otherwise-similar passages.

use std::hash::{Hash, Hasher};

use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHasher;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Reduce text to its comparison form.
pub fn normalize(text: &str) -> String {
    let scrubbed: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let lowered = scrubbed.to_lowercase();
    WHITESPACE_RUN
        .replace_all(lowered.trim(), " ")
        .into_owned()
}

/// Hash the normalized form of `text`.
pub fn fingerprint(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    normalize(text).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(
            normalize("  The   Eagle\n has\tlanded.  "),
            "the eagle has landed"
        );
    }

    #[test]
    fn test_normalize_is_punctuation_insensitive() {
        assert_eq!(normalize("Go, flight!"), normalize("go flight"));
    }

    #[test]
    fn test_normalize_keeps_digits() {
        assert_ne!(normalize("T minus 10"), normalize("T minus 20"));
    }

    #[test]
    fn test_fingerprint_matches_for_near_duplicates() {
        let a = fingerprint("The Eagle has landed.");
        let b = fingerprint("the  eagle HAS landed");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_differs_for_different_text() {
        assert_ne!(
            fingerprint("The Eagle has landed."),
            fingerprint("Houston, we've had a problem.")
        );
    }
}
