//! Configuration types for chunking and context assembly.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{
    DEFAULT_BOUNDARY_SEARCH_WINDOW, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_EMBED_BATCH_SIZE, DEFAULT_MAX_CHARS_PER_HIT, DEFAULT_MAX_TOTAL_HITS,
};

/// Configuration for a chunking pass.
///
/// All sizes are in characters. Validation happens before the first
/// chunk is produced; an invalid combination never yields partial
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Hard upper bound on chunk length
    pub chunk_size: usize,

    /// Characters shared between the end of one chunk and the start of
    /// the next
    pub chunk_overlap: usize,

    /// How far back from the candidate cut point to look for a sentence
    /// boundary; zero disables the boundary search entirely
    pub boundary_search_window: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            boundary_search_window: DEFAULT_BOUNDARY_SEARCH_WINDOW,
        }
    }
}

impl ChunkConfig {
    /// Create a config with the given chunk size.
    pub fn with_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }

    /// Set the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Set the boundary search window.
    pub fn with_boundary_window(mut self, window: usize) -> Self {
        self.boundary_search_window = window;
        self
    }

    /// Check the size/overlap combination.
    ///
    /// Overlap equal to or larger than the chunk size would stall the
    /// cursor, so it is rejected up front rather than at some chunk N.
    /// Negative values are unrepresentable; sizes are `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            chunk_size: env_usize("CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
            chunk_overlap: env_usize("CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP),
            boundary_search_window: env_usize(
                "BOUNDARY_SEARCH_WINDOW",
                DEFAULT_BOUNDARY_SEARCH_WINDOW,
            ),
        }
    }
}

/// Configuration for context assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Per-hit character cap; longer hit texts are cut, mid-word if need
    /// be (a safety cap, not a presentation concern)
    pub max_chars_per_hit: usize,

    /// Maximum number of hits included after dedup and sorting
    pub max_total_hits: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            max_chars_per_hit: DEFAULT_MAX_CHARS_PER_HIT,
            max_total_hits: DEFAULT_MAX_TOTAL_HITS,
        }
    }
}

impl AssemblyConfig {
    /// Set the per-hit character cap.
    pub fn with_max_chars_per_hit(mut self, max_chars: usize) -> Self {
        self.max_chars_per_hit = max_chars;
        self
    }

    /// Set the hit count cap.
    pub fn with_max_total_hits(mut self, max_hits: usize) -> Self {
        self.max_total_hits = max_hits;
        self
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            max_chars_per_hit: env_usize("MAX_CHARS_PER_HIT", DEFAULT_MAX_CHARS_PER_HIT),
            max_total_hits: env_usize("MAX_TOTAL_HITS", DEFAULT_MAX_TOTAL_HITS),
        }
    }
}

/// Aggregate settings for a whole pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Chunking parameters
    pub chunking: ChunkConfig,

    /// Context assembly parameters
    pub assembly: AssemblyConfig,

    /// Number of chunks sent to the embedder per batch
    pub embed_batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            assembly: AssemblyConfig::default(),
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}

impl Settings {
    /// Load settings from the environment, reading a `.env` file first
    /// when one is present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            chunking: ChunkConfig::from_env(),
            assembly: AssemblyConfig::from_env(),
            embed_batch_size: env_usize("EMBED_BATCH_SIZE", DEFAULT_EMBED_BATCH_SIZE),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ChunkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = ChunkConfig::with_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroChunkSize));
    }

    #[test]
    fn test_overlap_equal_to_size_rejected() {
        let config = ChunkConfig::with_size(100).with_overlap(100);
        assert_eq!(
            config.validate(),
            Err(ConfigError::OverlapTooLarge {
                overlap: 100,
                chunk_size: 100,
            })
        );
    }

    #[test]
    fn test_overlap_below_size_accepted() {
        let config = ChunkConfig::with_size(100).with_overlap(99);
        assert!(config.validate().is_ok());
    }
}
