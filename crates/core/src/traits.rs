use crate::error::QaError;
use crate::models::{DocumentChunk, RetrievedChunk};
use async_trait::async_trait;

/// Persistent chunk-embedding store. Chunk identity is path-level: upserts
/// and deletes always cover every chunk of one source file, so a re-indexed
/// file can never leave stale chunks from an earlier split behind.
#[async_trait]
pub trait VectorIndex {
    /// Creates backing storage for the given embedding dimension if it does
    /// not exist yet. Called once per run, with the dimension observed on
    /// the first embedded batch.
    async fn ensure_ready(&self, dimension: usize) -> Result<(), QaError>;

    async fn upsert_chunks(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), QaError>;

    /// Removes every chunk whose source is `source_path`.
    async fn delete_document(&self, source_path: &str) -> Result<(), QaError>;

    async fn retrieve(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, QaError>;
}
