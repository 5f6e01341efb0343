//! Wire types for the OpenAI-compatible chat-completions API.

use aide_core::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// A message as sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub top_p: f32,
    pub stream: bool,
}

/// Non-streaming response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
}

/// One streamed chunk (`data:` payload).
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text carried by this chunk, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// One classified line of a server-sent event stream.
#[derive(Debug)]
pub enum SseLine {
    /// A decoded chunk.
    Data(ChatCompletionChunk),
    /// The `[DONE]` terminator.
    Done,
    /// Blank lines, comments and non-data fields.
    Skip,
}

/// Classify one line of an SSE body.
pub fn parse_sse_line(line: &str) -> Result<SseLine, LlmError> {
    let line = line.trim();
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };

    let payload = payload.trim();
    if payload == "[DONE]" {
        return Ok(SseLine::Done);
    }

    Ok(SseLine::Data(serde_json::from_str(payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
        match parse_sse_line(line).unwrap() {
            SseLine::Data(chunk) => assert_eq!(chunk.text(), Some("Hel")),
            other => panic!("Expected Data, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_done_and_skip() {
        assert!(matches!(parse_sse_line("data: [DONE]").unwrap(), SseLine::Done));
        assert!(matches!(parse_sse_line("").unwrap(), SseLine::Skip));
        assert!(matches!(parse_sse_line(": keep-alive").unwrap(), SseLine::Skip));
    }

    #[test]
    fn test_role_only_chunk_has_no_text() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        match parse_sse_line(line).unwrap() {
            SseLine::Data(chunk) => assert_eq!(chunk.text(), None),
            other => panic!("Expected Data, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payload_is_error() {
        assert!(matches!(parse_sse_line("data: {nope"), Err(LlmError::Json(_))));
    }
}
