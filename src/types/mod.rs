//! Core type definitions.

mod chunk;
mod config;
mod document;
mod retrieval;

pub use chunk::Chunk;
pub use config::{AssemblyConfig, ChunkConfig, Settings};
pub use document::Document;
pub use retrieval::{AssembledContext, RetrievalHit};
