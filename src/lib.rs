//! Passages
//!
//! Text chunking and retrieved-context assembly for RAG pipelines over
//! historical document archives. The chunker splits raw documents into
//! bounded, overlapping passages that break at sentence boundaries where
//! possible; the assembler turns similarity-search hits back into a
//! deduplicated, relevance-ordered context block for a downstream
//! generator. Embedding and vector storage are external collaborators
//! reached through the traits in [`pipeline`].

pub mod assembler;
pub mod chunker;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod types;

pub use assembler::assemble;
pub use chunker::{chunk, chunk_document, Chunks};
pub use error::ConfigError;
pub use pipeline::{Embedder, IngestPipeline, IngestPolicy, VectorStore};
pub use types::{
    AssembledContext, AssemblyConfig, Chunk, ChunkConfig, Document, RetrievalHit, Settings,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assembler::assemble;
    pub use crate::chunker::{chunk, chunk_document};
    pub use crate::pipeline::*;
    pub use crate::types::*;
}

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default chunk overlap in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Default backward search window for sentence boundaries, in characters
pub const DEFAULT_BOUNDARY_SEARCH_WINDOW: usize = 100;

/// Default per-hit character cap when assembling context
pub const DEFAULT_MAX_CHARS_PER_HIT: usize = 1000;

/// Default maximum number of hits included in an assembled context
pub const DEFAULT_MAX_TOTAL_HITS: usize = 5;

/// Default number of chunks sent to the embedder per batch
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 50;
