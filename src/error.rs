//! Error types for the chunking and assembly core.

use thiserror::Error;

/// Invalid chunking parameters.
///
/// Raised before any chunk is produced; a caller that sees this must fix
/// the configuration and retry the whole call. Empty documents and empty
/// hit lists are valid inputs and never produce an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `chunk_size` must be at least one character.
    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    /// Overlap must leave room for forward progress.
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
}
