//! Long-form content generation over a streamed completion.

use aide_core::text::strip_stop_tokens;
use aide_core::{ChatMessage, ContentGenerator, CoreError};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::{ChatBackend, LlmClient};

/// Temperature used for content writing when the writer owns its client.
pub const CONTENT_TEMPERATURE: f32 = 0.8;

const WRITER_PROMPT: &str = "You are a professional content creator. Write clear, well structured \
content such as letters, applications, essays, articles, code and poems. Do not add notes about \
yourself, only write the requested content.";

/// Streams content for `content <topic>` instructions.
pub struct ContentWriter<B = LlmClient> {
    backend: B,
}

impl ContentWriter<LlmClient> {
    /// Wrap a client, raising its temperature for creative output.
    pub fn from_client(client: LlmClient) -> Self {
        Self::new(client.with_temperature(CONTENT_TEMPERATURE).with_max_tokens(Some(2048)))
    }
}

impl<B: ChatBackend> ContentWriter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn build_messages(topic: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(WRITER_PROMPT),
            ChatMessage::user(format!("Write content on the topic: {}", topic)),
        ]
    }
}

#[async_trait]
impl<B: ChatBackend> ContentGenerator for ContentWriter<B> {
    async fn generate(
        &self,
        topic: &str,
        on_chunk: &(dyn for<'c> Fn(&'c str) + Send + Sync),
    ) -> Result<String, CoreError> {
        debug!(topic = %topic, "Generating content");
        let text = self
            .backend
            .stream(&Self::build_messages(topic), on_chunk)
            .await
            .map_err(|e| CoreError::Generation(e.to_string()))?;

        let text = strip_stop_tokens(&text);
        if text.trim().is_empty() {
            return Err(CoreError::Generation("model returned no content".to_string()));
        }
        info!(topic = %topic, chars = text.len(), "Content generated");
        Ok(text)
    }
}
