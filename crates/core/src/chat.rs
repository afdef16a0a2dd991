use crate::error::QaError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait ChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, QaError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Non-streaming chat client for a local Ollama server. Sends a single
/// user-role message and returns the assistant's text.
pub struct OllamaChat {
    client: Client,
    base: String,
    model: String,
}

impl OllamaChat {
    pub fn new(base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, prompt: &str) -> Result<String, QaError> {
        let url = format!("{}/api/chat", self.base);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(QaError::Backend {
                backend: "ollama".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .message
            .map(|message| message.content)
            .ok_or_else(|| QaError::Backend {
                backend: "ollama".to_string(),
                details: "chat response had no message".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::ChatResponse;

    #[test]
    fn chat_response_content_is_read_from_message() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"message": {"role": "assistant", "content": "hi"}}"#).unwrap();
        assert_eq!(parsed.message.unwrap().content, "hi");
    }
}
