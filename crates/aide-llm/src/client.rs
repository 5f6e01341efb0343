//! HTTP client for OpenAI-compatible chat completions.

use aide_core::ChatMessage;
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::types::{parse_sse_line, ChatCompletionRequest, ChatCompletionResponse, SseLine, WireMessage};

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Something that can turn a message list into assistant text.
///
/// Implemented by [`LlmClient`]; the collaborators are generic over it so
/// tests can substitute scripted backends.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Return the full completion in one piece.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Stream the completion, calling `on_delta` for every text piece, and
    /// return the assembled text.
    async fn stream(
        &self,
        messages: &[ChatMessage],
        on_delta: &(dyn for<'c> Fn(&'c str) + Send + Sync),
    ) -> Result<String, LlmError>;
}

/// Chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LlmClient {
    /// Create a new client with the given API key and default endpoint/model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: Some(1024),
        }
    }

    /// Set the API root (without the `/chat/completions` suffix).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token limit (`None` leaves it to the server).
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Model name in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request<'a>(&'a self, messages: &[ChatMessage], stream: bool) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: 1.0,
            stream,
        }
    }

    async fn send(&self, body: &ChatCompletionRequest<'_>) -> Result<reqwest::Response, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        debug!(
            url = %self.endpoint(),
            model = %self.model,
            messages = body.messages.len(),
            stream = body.stream,
            "Sending completion request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let response = self.send(&self.request(messages, false)).await?;
        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        on_delta: &(dyn for<'c> Fn(&'c str) + Send + Sync),
    ) -> Result<String, LlmError> {
        let response = self.send(&self.request(messages, true)).await?;
        read_sse(response.bytes_stream(), on_delta).await
    }
}

/// Assemble the text of an SSE completion body, forwarding each piece.
///
/// Lines are split on raw bytes so multi-byte characters survive chunking.
pub(crate) async fn read_sse<S, B, E>(
    body: S,
    on_delta: &(dyn for<'c> Fn(&'c str) + Send + Sync),
) -> Result<String, LlmError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut body = std::pin::pin!(body);
    let mut pending: Vec<u8> = Vec::new();
    let mut assembled = String::new();
    let mut chunk_count = 0u64;
    let mut done = false;

    while let Some(bytes) = body.next().await {
        let bytes = bytes.map_err(|e| LlmError::Stream(e.to_string()))?;
        pending.extend_from_slice(bytes.as_ref());

        while let Some(newline) = pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = pending.drain(..=newline).collect();
            if feed_line(&raw, on_delta, &mut assembled, &mut chunk_count)? {
                done = true;
                break;
            }
        }
        if done {
            break;
        }
    }

    // A final line without a trailing newline.
    if !done && !pending.is_empty() {
        feed_line(&pending, on_delta, &mut assembled, &mut chunk_count)?;
    }

    info!(chunks = chunk_count, chars = assembled.len(), "Completion stream finished");

    if assembled.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(assembled)
}

/// Handle one raw SSE line. Returns true on the `[DONE]` terminator.
fn feed_line(
    raw: &[u8],
    on_delta: &(dyn for<'c> Fn(&'c str) + Send + Sync),
    assembled: &mut String,
    chunk_count: &mut u64,
) -> Result<bool, LlmError> {
    let line = String::from_utf8_lossy(raw);
    match parse_sse_line(&line)? {
        SseLine::Data(chunk) => {
            if let Some(text) = chunk.text() {
                *chunk_count += 1;
                on_delta(text);
                assembled.push_str(text);
            }
            Ok(false)
        }
        SseLine::Done => Ok(true),
        SseLine::Skip => Ok(false),
    }
}
