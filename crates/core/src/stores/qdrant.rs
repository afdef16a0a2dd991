use crate::models::{DocumentChunk, RetrievedChunk};
use crate::traits::VectorIndex;
use crate::QaError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Vector store over the Qdrant HTTP API. One collection holds one document
/// corpus; points carry the chunk text and source path as payload so hits
/// can be shown without re-reading the PDF.
pub struct QdrantStore {
    endpoint: String,
    collection: String,
    client: Client,
}

impl QdrantStore {
    pub fn new(endpoint: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            client: Client::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.endpoint, self.collection)
    }
}

/// Deterministic point id for one chunk. Qdrant wants u64 or UUID ids, so
/// the (path, chunk_index) pair is hashed down to a u64.
fn point_id(chunk: &DocumentChunk) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(chunk.source_path.as_bytes());
    hasher.update(chunk.chunk_index.to_le_bytes());
    let digest = hasher.finalize();
    u64::from_le_bytes(
        digest[..8]
            .try_into()
            .unwrap_or([0u8; 8]),
    )
}

#[async_trait]
impl VectorIndex for QdrantStore {
    async fn ensure_ready(&self, dimension: usize) -> Result<(), QaError> {
        let response = self.client.get(self.collection_url()).send().await?;
        if response.status() == StatusCode::OK {
            return Ok(());
        }

        let response = self
            .client
            .put(self.collection_url())
            .json(&json!({
                "vectors": {
                    "size": dimension,
                    "distance": "Cosine",
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QaError::Backend {
                backend: "qdrant".to_string(),
                details: format!("collection setup failed with {}", response.status()),
            });
        }

        Ok(())
    }

    async fn upsert_chunks(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), QaError> {
        if chunks.len() != embeddings.len() {
            return Err(QaError::Request(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        if chunks.is_empty() {
            return Ok(());
        }

        let points = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| {
                json!({
                    "id": point_id(chunk),
                    "vector": embedding,
                    "payload": {
                        "source_path": chunk.source_path,
                        "chunk_index": chunk.chunk_index,
                        "page": chunk.page,
                        "text": chunk.text,
                    },
                })
            })
            .collect::<Vec<_>>();

        let response = self
            .client
            .put(format!("{}/points?wait=true", self.collection_url()))
            .json(&json!({ "points": points }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QaError::Backend {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    async fn delete_document(&self, source_path: &str) -> Result<(), QaError> {
        let response = self
            .client
            .post(format!("{}/points/delete?wait=true", self.collection_url()))
            .json(&json!({
                "filter": {
                    "must": [
                        { "key": "source_path", "match": { "value": source_path } }
                    ]
                }
            }))
            .send()
            .await?;

        // Deleting from a collection that was never created is a no-op.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(QaError::Backend {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    async fn retrieve(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, QaError> {
        let response = self
            .client
            .post(format!("{}/points/search", self.collection_url()))
            .json(&json!({
                "vector": query_vector,
                "limit": top_k,
                "with_payload": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QaError::Backend {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        let hits = parsed
            .pointer("/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut result = Vec::new();
        for hit in hits {
            let score = hit.pointer("/score").and_then(Value::as_f64).unwrap_or(0.0);
            let source_path = hit
                .pointer("/payload/source_path")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let text = hit
                .pointer("/payload/text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            result.push(RetrievedChunk {
                source_path,
                score,
                text,
            });
        }

        Ok(result)
    }
}
