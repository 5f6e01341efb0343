//! Collaborator traits consumed by the dispatcher.
//!
//! Each trait is an external oracle from the dispatcher's point of view: the
//! LLM crate provides network-backed implementations and tests substitute
//! in-memory fakes.

use async_trait::async_trait;

use crate::error::CoreError;

/// Maps one raw instruction to tagged lines (`"<category> <payload>"` or `"exit"`).
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, instruction: &str) -> Result<Vec<String>, CoreError>;
}

/// Produces the conversational answer for a merged query.
#[async_trait]
pub trait Responder: Send + Sync {
    /// `context` is the opaque memory block for the current user; it may be empty.
    async fn respond(&self, query: &str, realtime: bool, context: &str) -> Result<String, CoreError>;
}

/// Writes long-form content, reporting each streamed piece to `on_chunk`.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Returns the fully assembled text.
    async fn generate(
        &self,
        topic: &str,
        on_chunk: &(dyn for<'c> Fn(&'c str) + Send + Sync),
    ) -> Result<String, CoreError>;
}

/// Read/append access to the user's memories, owned by the persistence layer.
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn get_context(&self, user_id: &str) -> Result<String, CoreError>;

    async fn record_exchange(
        &self,
        user_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), CoreError>;
}

/// Supplies short web snippets used to ground real-time answers.
#[async_trait]
pub trait SnippetSource: Send + Sync {
    async fn snippets(&self, query: &str, limit: usize) -> Result<Vec<String>, CoreError>;
}

/// Context store used when no memory API is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

#[async_trait]
impl ContextStore for NoContext {
    async fn get_context(&self, _user_id: &str) -> Result<String, CoreError> {
        Ok(String::new())
    }

    async fn record_exchange(
        &self,
        _user_id: &str,
        _user_text: &str,
        _assistant_text: &str,
    ) -> Result<(), CoreError> {
        Ok(())
    }
}
