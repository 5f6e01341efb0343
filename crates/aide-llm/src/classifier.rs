//! LLM-backed intent classifier.

use aide_core::{ChatMessage, CoreError, IntentClassifier};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::client::{ChatBackend, LlmClient};

/// Placeholder the model sometimes echoes instead of filling in the payload.
const PLACEHOLDER: &str = "(query)";

const PREAMBLE: &str = r#"You are a decision-making model. You decide what kind of request the user is making. You do not answer it.
Reply with one or more lines separated by commas, each in exactly one of these forms:
-> 'general (query)' for questions a chatbot can answer without up-to-date information, and for anything you cannot classify.
-> 'realtime (query)' for questions that need current information (news, weather, prices, recent events, people in the news).
-> 'open (application or website name)' to open an application or website.
-> 'close (application name)' to close an application.
-> 'play (song or video name)' to play media.
-> 'content (topic)' to write a letter, essay, code, poem, email or any other document.
-> 'google search (topic)' to search the web.
-> 'youtube search (topic)' to search for videos.
-> 'system (task)' for volume up/down, brightness up/down, mute mic or unmute mic, keeping any percentage the user gave.
-> 'exit' when the user says goodbye or wants to end the conversation.
If the request contains several tasks, emit one line per task, e.g. 'open chrome, close notepad, general how are you'.
Never explain your answer."#;

/// Few-shot turns shown before the real instruction.
const EXAMPLES: &[(&str, &str)] = &[
    ("how are you?", "general how are you?"),
    ("open chrome and tell me about mahatma gandhi.", "open chrome, general tell me about mahatma gandhi."),
    ("turn the volume up by 20 percent and play lofi beats", "system volume up 20%, play lofi beats"),
    ("what's the weather in lisbon today? then write an email asking for leave", "realtime what's the weather in lisbon today?, content email asking for leave"),
    ("bye", "exit"),
];

/// Split a classifier reply into trimmed, non-empty lines.
pub fn parse_decision(reply: &str) -> Vec<String> {
    reply
        .replace('\n', ",")
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Intent classifier that asks a chat model to tag the instruction.
pub struct LlmClassifier<B = LlmClient> {
    backend: B,
}

impl<B: ChatBackend> LlmClassifier<B> {
    /// Create a classifier over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn build_messages(instruction: &str) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(PREAMBLE)];
        for (user, tagged) in EXAMPLES {
            messages.push(ChatMessage::user(*user));
            messages.push(ChatMessage::assistant(*tagged));
        }
        messages.push(ChatMessage::user(instruction));
        messages
    }

    async fn ask(&self, instruction: &str) -> Result<Vec<String>, CoreError> {
        let reply = self
            .backend
            .complete(&Self::build_messages(instruction))
            .await
            .map_err(|e| CoreError::Classification(e.to_string()))?;
        debug!(reply = %reply, "Classifier reply");
        Ok(parse_decision(&reply))
    }
}

#[async_trait]
impl<B: ChatBackend> IntentClassifier for LlmClassifier<B> {
    async fn classify(&self, instruction: &str) -> Result<Vec<String>, CoreError> {
        let mut lines = self.ask(instruction).await?;

        if lines.iter().any(|l| l.contains(PLACEHOLDER)) {
            warn!("Classifier echoed the payload placeholder, asking once more");
            lines = self.ask(instruction).await?;
        }

        if lines.is_empty() {
            return Err(CoreError::Classification(
                "classifier returned no usable lines".to_string(),
            ));
        }

        info!(lines = ?lines, "Instruction classified");
        Ok(lines)
    }
}
