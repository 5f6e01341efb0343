//! `google search` and `youtube search`: open a results page.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::HandlerError;
use crate::platform::Opener;
use crate::registry::ActionHandler;
use crate::web::{google_search_url, youtube_search_url};

/// Which results page to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    Youtube,
}

impl SearchEngine {
    fn name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Youtube => "YouTube",
        }
    }
}

pub struct SearchHandler {
    engine: SearchEngine,
    opener: Arc<dyn Opener>,
}

impl SearchHandler {
    pub fn new(engine: SearchEngine, opener: Arc<dyn Opener>) -> Self {
        Self { engine, opener }
    }
}

#[async_trait]
impl ActionHandler for SearchHandler {
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        let url = match self.engine {
            SearchEngine::Google => google_search_url(argument),
            SearchEngine::Youtube => youtube_search_url(argument),
        };

        self.opener.open_url(url.as_str()).await?;
        info!(engine = self.engine.name(), query = %argument, "Search opened");
        Ok(format!("Searched {} for {}", self.engine.name(), argument))
    }
}
