//! Conversational responder with local history and a single bounded retry.

use std::sync::Arc;

use aide_core::text::tidy_answer;
use aide_core::{ChatMessage, CoreError, Responder, SnippetSource};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::client::{ChatBackend, LlmClient};

/// History turns kept between requests (user + assistant messages).
const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Web snippets included in a real-time answer.
const SNIPPET_LIMIT: usize = 5;

/// Render the current date and time for the model.
pub fn realtime_information(now: DateTime<Local>) -> String {
    format!(
        "Please use this real-time information if needed,\nDay: {}\nDate: {}\nMonth: {}\nYear: {}\nTime: {} hours: {} minutes: {} seconds.\n",
        now.format("%A"),
        now.format("%d"),
        now.format("%B"),
        now.format("%Y"),
        now.format("%H"),
        now.format("%M"),
        now.format("%S"),
    )
}

/// Chat-model responder for `general` and `realtime` queries.
pub struct Chatbot<B = LlmClient> {
    backend: B,
    assistant_name: String,
    user_name: String,
    snippets: Option<Arc<dyn SnippetSource>>,
    history: Mutex<Vec<ChatMessage>>,
    history_limit: usize,
}

impl<B: ChatBackend> Chatbot<B> {
    /// Create a chatbot speaking as `assistant_name` to `user_name`.
    pub fn new(backend: B, assistant_name: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            backend,
            assistant_name: assistant_name.into(),
            user_name: user_name.into(),
            snippets: None,
            history: Mutex::new(Vec::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Builder method to ground real-time answers in web snippets.
    pub fn with_snippets(mut self, source: Arc<dyn SnippetSource>) -> Self {
        self.snippets = Some(source);
        self
    }

    /// Builder method to set how many history messages are kept.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Drop the local conversation history.
    pub async fn reset(&self) {
        self.history.lock().await.clear();
    }

    fn persona(&self) -> String {
        format!(
            "Hello, I am {user}, You are a very accurate and advanced AI chatbot named {name} which also has real-time up-to-date information from the internet.\n\
             *** Do not tell time until I ask, do not talk too much, just answer the question. ***\n\
             *** Reply in only English, even if the question is in another language. ***\n\
             *** Do not provide notes in the output, just answer the question and never mention your training data. ***\n\
             *** Use the user's name ({user}) when it makes the conversation more personal. ***",
            user = self.user_name,
            name = self.assistant_name,
        )
    }

    async fn snippet_block(&self, query: &str) -> Option<String> {
        let source = self.snippets.as_ref()?;
        match source.snippets(query, SNIPPET_LIMIT).await {
            Ok(found) if !found.is_empty() => Some(format!(
                "The search results for '{}' are:\n{}",
                query,
                found
                    .iter()
                    .map(|s| format!("- {}", s))
                    .collect::<Vec<_>>()
                    .join("\n")
            )),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Snippet lookup failed, answering without it");
                None
            }
        }
    }

    async fn build_messages(&self, query: &str, realtime: bool, context: &str) -> Vec<ChatMessage> {
        let mut messages = vec![
            ChatMessage::system(self.persona()),
            ChatMessage::system(realtime_information(Local::now())),
        ];

        if !context.trim().is_empty() {
            messages.push(ChatMessage::system(context));
        }

        if realtime {
            if let Some(block) = self.snippet_block(query).await {
                messages.push(ChatMessage::system(block));
            }
        }

        messages.extend(self.history.lock().await.iter().cloned());
        messages.push(ChatMessage::user(query));
        messages
    }

    async fn attempt(&self, query: &str, realtime: bool, context: &str) -> Result<String, CoreError> {
        let messages = self.build_messages(query, realtime, context).await;
        let answer = self
            .backend
            .complete(&messages)
            .await
            .map_err(|e| CoreError::Generation(e.to_string()))?;
        let answer = tidy_answer(&answer);

        let mut history = self.history.lock().await;
        history.push(ChatMessage::user(query));
        history.push(ChatMessage::assistant(answer.clone()));
        let excess = history.len().saturating_sub(self.history_limit);
        history.drain(..excess);

        Ok(answer)
    }
}

#[async_trait]
impl<B: ChatBackend> Responder for Chatbot<B> {
    async fn respond(&self, query: &str, realtime: bool, context: &str) -> Result<String, CoreError> {
        match self.attempt(query, realtime, context).await {
            Ok(answer) => Ok(answer),
            Err(first) => {
                // Local history may be what broke the request; retry once from a clean slate.
                warn!(error = %first, "Chat request failed, resetting history and retrying once");
                self.reset().await;
                let answer = self.attempt(query, realtime, context).await?;
                info!("Chat retry succeeded");
                Ok(answer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls, then echoes the last user message.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl Flaky {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                calls: AtomicUsize::new(0),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for Flaky {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(LlmError::EmptyResponse);
            }
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(format!("echo: {}\n\n</s>", last))
        }

        async fn stream(
            &self,
            messages: &[ChatMessage],
            _on_delta: &(dyn for<'c> Fn(&'c str) + Send + Sync),
        ) -> Result<String, LlmError> {
            self.complete(messages).await
        }
    }

    struct FixedSnippets;

    #[async_trait]
    impl SnippetSource for FixedSnippets {
        async fn snippets(&self, _query: &str, _limit: usize) -> Result<Vec<String>, CoreError> {
            Ok(vec!["Porto 21C sunny".to_string()])
        }
    }

    #[test]
    fn test_realtime_information_format() {
        let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 5, 7).unwrap();
        let info = realtime_information(now);
        assert!(info.contains("Day: Friday"));
        assert!(info.contains("Month: October"));
        assert!(info.contains("Time: 09 hours: 05 minutes: 07 seconds."));
    }

    #[tokio::test]
    async fn test_answer_is_tidied_and_remembered() {
        let bot = Chatbot::new(Flaky::new(0), "Aide", "sam");
        let answer = bot.respond("Hi there.", false, "").await.unwrap();
        assert_eq!(answer, "echo: Hi there.");

        bot.respond("Again.", false, "").await.unwrap();
        let seen = bot.backend.seen.lock().unwrap();
        let second = &seen[1];
        assert!(second.iter().any(|m| m.content == "echo: Hi there."));
    }

    #[tokio::test]
    async fn test_single_retry_after_reset() {
        let bot = Chatbot::new(Flaky::new(1), "Aide", "sam");
        let answer = bot.respond("Hello.", false, "").await.unwrap();
        assert_eq!(answer, "echo: Hello.");
        assert_eq!(bot.backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_failure_stops_after_one_retry() {
        let bot = Chatbot::new(Flaky::new(10), "Aide", "sam");
        let result = bot.respond("Hello.", false, "").await;
        assert!(matches!(result, Err(CoreError::Generation(_))));
        assert_eq!(bot.backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_context_and_snippets_reach_the_prompt() {
        let bot = Chatbot::new(Flaky::new(0), "Aide", "sam").with_snippets(Arc::new(FixedSnippets));
        bot.respond("Weather in porto?", true, "User's name: sam").await.unwrap();

        let seen = bot.backend.seen.lock().unwrap();
        let prompt = &seen[0];
        assert!(prompt.iter().any(|m| m.content == "User's name: sam"));
        assert!(prompt.iter().any(|m| m.content.contains("Porto 21C sunny")));
    }

    #[tokio::test]
    async fn test_history_limit() {
        let bot = Chatbot::new(Flaky::new(0), "Aide", "sam").with_history_limit(2);
        bot.respond("One.", false, "").await.unwrap();
        bot.respond("Two.", false, "").await.unwrap();
        assert_eq!(bot.history.lock().await.len(), 2);
    }
}
