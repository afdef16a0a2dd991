use crate::error::QaError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait Embedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, QaError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, QaError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Ollama returns `embedding` for the legacy endpoint and `embeddings` for
/// `/api/embed`; accept either shape.
#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Option<Vec<f32>>,
    embeddings: Option<Vec<Vec<f32>>>,
}

/// Embeddings client for a local Ollama server. The same model name drives
/// both embedding and chat in this stack.
pub struct OllamaEmbedder {
    client: Client,
    base: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, QaError> {
        let url = format!("{}/api/embed", self.base);
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QaError::Backend {
                backend: "ollama".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: EmbedResponse = response.json().await?;
        if let Some(vector) = parsed.embedding {
            return Ok(vector);
        }
        if let Some(vectors) = parsed.embeddings {
            if let Some(first) = vectors.into_iter().next() {
                return Ok(first);
            }
        }

        Err(QaError::Backend {
            backend: "ollama".to_string(),
            details: "no embedding in response".to_string(),
        })
    }
}
