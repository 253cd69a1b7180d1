//! Ingestion pipeline and collaborator seams.
//!
//! The crate does not talk to an embedding service or a vector index
//! itself; callers plug those in through the [`Embedder`] and
//! [`VectorStore`] traits. The pipeline wires the chunker to them and
//! applies the re-ingestion policy that stable chunk ids make possible:
//! because re-chunking a document reproduces the same ids, a second
//! ingest can skip, update, or replace what the store already holds.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chunker::chunk_document;
use crate::types::{Chunk, ChunkConfig, Document};
use crate::DEFAULT_EMBED_BATCH_SIZE;

/// Embedding collaborator. Returns one vector per input text, in order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Vector index collaborator.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Which of the given stable ids are already stored.
    async fn existing_ids(&self, ids: &[String]) -> Result<Vec<String>>;

    /// Insert or overwrite records by stable id. Returns the number of
    /// records written.
    async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<usize>;

    /// Remove every chunk belonging to a document. Returns the number
    /// of records removed.
    async fn delete_document(&self, document_id: &str) -> Result<usize>;
}

/// A chunk paired with its embedding, ready for the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// What to do when a document's chunks already exist in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestPolicy {
    /// Leave already-stored chunks alone; embed and write only new ids
    Skip,
    /// Re-embed everything and overwrite by stable id
    Update,
    /// Delete the document's stored chunks first, then write fresh
    Replace,
}

/// Summary of one document ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub document_id: String,
    pub chunks_total: usize,
    pub chunks_skipped: usize,
    pub chunks_upserted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Pipeline from raw documents to stored, embedded chunks.
pub struct IngestPipeline {
    chunk_config: ChunkConfig,
    policy: IngestPolicy,
    embed_batch_size: usize,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl IngestPipeline {
    /// Create a pipeline with the skip policy and default batch size.
    pub fn new(
        chunk_config: ChunkConfig,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            chunk_config,
            policy: IngestPolicy::Skip,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            embedder,
            store,
        }
    }

    /// Set the re-ingestion policy.
    pub fn with_policy(mut self, policy: IngestPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the embedding batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.embed_batch_size = size.max(1);
        self
    }

    /// Chunk, embed, and store one document.
    pub async fn ingest(&self, document: &Document) -> Result<IngestReport> {
        let started_at = Utc::now();
        let document_id = document.identifier().to_string();

        let chunks = chunk_document(document, &self.chunk_config)?;
        let chunks_total = chunks.len();
        info!(
            document = %document_id,
            chunks = chunks_total,
            policy = ?self.policy,
            "Ingesting document"
        );

        let to_write = match self.policy {
            IngestPolicy::Update => chunks,
            IngestPolicy::Replace => {
                let removed = self.store.delete_document(&document_id).await?;
                debug!(document = %document_id, removed, "Cleared stored chunks");
                chunks
            }
            IngestPolicy::Skip => {
                let ids: Vec<String> = chunks.iter().map(|c| c.stable_id.clone()).collect();
                let existing: HashSet<String> =
                    self.store.existing_ids(&ids).await?.into_iter().collect();
                chunks
                    .into_iter()
                    .filter(|c| !existing.contains(&c.stable_id))
                    .collect()
            }
        };
        let chunks_skipped = chunks_total - to_write.len();

        let chunks_upserted = self.embed_and_store(to_write).await?;

        let report = IngestReport {
            document_id,
            chunks_total,
            chunks_skipped,
            chunks_upserted,
            started_at,
            finished_at: Utc::now(),
        };
        debug!(report = %serde_json::to_string(&report)?, "Ingest finished");
        Ok(report)
    }

    /// Embed chunks in batches, then upsert batch by batch.
    async fn embed_and_store(&self, chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let batches: Vec<&[Chunk]> = chunks.chunks(self.embed_batch_size).collect();
        let embeddings = futures::future::try_join_all(batches.iter().map(|batch| async move {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            self.embedder.embed(&texts).await
        }))
        .await?;

        let mut upserted = 0;
        for (batch, vectors) in batches.iter().zip(embeddings) {
            anyhow::ensure!(
                vectors.len() == batch.len(),
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                batch.len()
            );
            let records: Vec<ChunkRecord> = batch
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(chunk, embedding)| ChunkRecord { chunk, embedding })
                .collect();
            upserted += self.store.upsert(records).await?;
        }
        Ok(upserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockEmbedder;

    #[async_trait]
    impl Embedder for MockEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 0.0]).collect())
        }
    }

    #[derive(Default)]
    struct MockStore {
        records: Mutex<HashMap<String, ChunkRecord>>,
        deletes: Mutex<usize>,
    }

    #[async_trait]
    impl VectorStore for MockStore {
        async fn existing_ids(&self, ids: &[String]) -> Result<Vec<String>> {
            let records = self.records.lock().unwrap();
            Ok(ids
                .iter()
                .filter(|id| records.contains_key(*id))
                .cloned()
                .collect())
        }

        async fn upsert(&self, records: Vec<ChunkRecord>) -> Result<usize> {
            let mut stored = self.records.lock().unwrap();
            let count = records.len();
            for record in records {
                stored.insert(record.chunk.stable_id.clone(), record);
            }
            Ok(count)
        }

        async fn delete_document(&self, document_id: &str) -> Result<usize> {
            let mut stored = self.records.lock().unwrap();
            let before = stored.len();
            stored.retain(|_, record| {
                record.chunk.metadata.get("source").map(String::as_str) != Some(document_id)
            });
            *self.deletes.lock().unwrap() += 1;
            Ok(before - stored.len())
        }
    }

    fn pipeline(store: Arc<MockStore>) -> IngestPipeline {
        let config = ChunkConfig::with_size(20).with_overlap(5);
        IngestPipeline::new(config, Arc::new(MockEmbedder), store)
    }

    fn document() -> Document {
        Document::new(
            "Sentence one. Sentence two. Sentence three. Sentence four.",
            "apollo11/summary.txt",
            "apollo_11",
            "summary",
        )
    }

    #[tokio::test]
    async fn test_ingest_stores_every_chunk() {
        let store = Arc::new(MockStore::default());
        let report = pipeline(Arc::clone(&store)).ingest(&document()).await.unwrap();

        assert!(report.chunks_total > 1);
        assert_eq!(report.chunks_skipped, 0);
        assert_eq!(report.chunks_upserted, report.chunks_total);
        assert_eq!(store.records.lock().unwrap().len(), report.chunks_total);
    }

    #[tokio::test]
    async fn test_skip_policy_makes_reingest_a_noop() {
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline(Arc::clone(&store));

        let first = pipeline.ingest(&document()).await.unwrap();
        let second = pipeline.ingest(&document()).await.unwrap();

        assert_eq!(second.chunks_total, first.chunks_total);
        assert_eq!(second.chunks_skipped, first.chunks_total);
        assert_eq!(second.chunks_upserted, 0);
    }

    #[tokio::test]
    async fn test_replace_policy_clears_before_writing() {
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline(Arc::clone(&store)).with_policy(IngestPolicy::Replace);

        pipeline.ingest(&document()).await.unwrap();
        let second = pipeline.ingest(&document()).await.unwrap();

        assert_eq!(*store.deletes.lock().unwrap(), 2);
        assert_eq!(second.chunks_skipped, 0);
        assert_eq!(second.chunks_upserted, second.chunks_total);
    }

    #[tokio::test]
    async fn test_update_policy_overwrites_by_stable_id() {
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline(Arc::clone(&store)).with_policy(IngestPolicy::Update);

        pipeline.ingest(&document()).await.unwrap();
        let second = pipeline.ingest(&document()).await.unwrap();

        // Same stable ids, so the store size does not grow.
        assert_eq!(
            store.records.lock().unwrap().len(),
            second.chunks_total
        );
        assert_eq!(second.chunks_upserted, second.chunks_total);
    }

    #[tokio::test]
    async fn test_empty_document_produces_empty_report() {
        let store = Arc::new(MockStore::default());
        let empty = Document::new("", "apollo11/empty.txt", "apollo_11", "document");
        let report = pipeline(Arc::clone(&store)).ingest(&empty).await.unwrap();

        assert_eq!(report.chunks_total, 0);
        assert_eq!(report.chunks_upserted, 0);
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_any_store_call() {
        let store = Arc::new(MockStore::default());
        let bad_config = ChunkConfig::with_size(10).with_overlap(10);
        let pipeline = IngestPipeline::new(bad_config, Arc::new(MockEmbedder), store.clone());

        let result = pipeline.ingest(&document()).await;
        assert!(result.is_err());
        assert!(store.records.lock().unwrap().is_empty());
    }
}
