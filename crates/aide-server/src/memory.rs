//! Memory API client used as the dispatcher's context store.

use aide_core::memory::format_context;
use aide_core::{ContextStore, CoreError, MemoryEntry, MemoryKind};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

/// Characters of each side kept when an exchange is stored.
const EXCHANGE_EXCERPT: usize = 100;

/// REST client for the memory API (`GET`/`POST /memories`).
///
/// The API scopes memories by the bearer token; `user_id` is only logged.
pub struct HttpContextStore {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    user_name: String,
}

impl HttpContextStore {
    /// Create a new client for the API at `base_url`.
    pub fn new(base_url: &str, user_name: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            user_name: user_name.into(),
        }
    }

    /// Builder method to set the bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let url = format!("{}/memories", self.base_url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch(&self) -> Result<Vec<MemoryEntry>, reqwest::Error> {
        let rows: Vec<Value> = self
            .request(reqwest::Method::GET)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_entries(rows))
    }
}

/// Keep the rows that are well-formed memories; skip the rest.
fn parse_entries(rows: Vec<Value>) -> Vec<MemoryEntry> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping malformed memory");
                None
            }
        })
        .collect()
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCHANGE_EXCERPT).collect()
}

/// The `context` memory stored for one exchange.
pub fn exchange_memory(user_text: &str, assistant_text: &str, timestamp: i64) -> MemoryEntry {
    MemoryEntry::new(
        MemoryKind::Context,
        format!("conversation_{}", timestamp),
        format!(
            "User: {}... Assistant: {}...",
            excerpt(user_text),
            excerpt(assistant_text)
        ),
    )
}

#[async_trait]
impl ContextStore for HttpContextStore {
    async fn get_context(&self, user_id: &str) -> Result<String, CoreError> {
        let entries = self.fetch().await.map_err(|e| {
            warn!(user_id = %user_id, error = %e, "Memory fetch failed");
            CoreError::Context(e.to_string())
        })?;

        debug!(user_id = %user_id, memories = entries.len(), "Fetched memories");
        Ok(format_context(&self.user_name, &entries))
    }

    async fn record_exchange(
        &self,
        user_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), CoreError> {
        let memory = exchange_memory(user_text, assistant_text, Utc::now().timestamp_millis());

        self.request(reqwest::Method::POST)
            .json(&memory)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| CoreError::Context(e.to_string()))?;

        debug!(user_id = %user_id, key = %memory.key, "Exchange recorded");
        Ok(())
    }
}
