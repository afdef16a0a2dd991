use crate::chat::ChatModel;
use crate::embeddings::Embedder;
use crate::error::QaError;
use crate::traits::VectorIndex;
use regex::Regex;

const THINKING_MARKUP: &str = r"(?s)<think>.*?</think>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Unindexed,
    Ready,
}

/// Bridges retrieval and chat: embeds the question, pulls the top-K chunks
/// from the vector index, and asks the chat model with the retrieved context
/// inlined into the prompt.
///
/// The engine starts `Unindexed`; asking a question before [`mark_ready`]
/// is a typed [`QaError::NotReady`], not a silent empty answer.
///
/// [`mark_ready`]: QaEngine::mark_ready
pub struct QaEngine<V, E, C> {
    index: V,
    embedder: E,
    chat: C,
    top_k: usize,
    state: IndexState,
    thinking: Regex,
}

impl<V, E, C> QaEngine<V, E, C>
where
    V: VectorIndex + Send + Sync,
    E: Embedder + Send + Sync,
    C: ChatModel + Send + Sync,
{
    pub fn new(index: V, embedder: E, chat: C, top_k: usize) -> Result<Self, QaError> {
        Ok(Self {
            index,
            embedder,
            chat,
            top_k,
            state: IndexState::Unindexed,
            thinking: Regex::new(THINKING_MARKUP)?,
        })
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    /// Marks the backing index as populated. Called once after a successful
    /// synchronization pass.
    pub fn mark_ready(&mut self) {
        self.state = IndexState::Ready;
    }

    pub async fn answer(&self, question: &str) -> Result<String, QaError> {
        if self.state == IndexState::Unindexed {
            return Err(QaError::NotReady(
                "documents have not been indexed yet".to_string(),
            ));
        }

        let query_vector = self.embedder.embed(question).await?;
        let hits = self.index.retrieve(&query_vector, self.top_k).await?;

        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!("Question: {question}\n\nContext: {context}");
        let reply = self.chat.complete(&prompt).await?;

        Ok(self.strip_thinking(&reply))
    }

    /// Removes every `<think>...</think>` span from the reply. An opening
    /// marker without a closing one is left as-is; this is a display
    /// cleanup, not a sanitizer with guarantees.
    fn strip_thinking(&self, reply: &str) -> String {
        self.thinking.replace_all(reply, "").trim().to_string()
    }
}
