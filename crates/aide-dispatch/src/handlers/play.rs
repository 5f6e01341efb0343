//! `play`: open the top video for the argument.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::HandlerError;
use crate::platform::Opener;
use crate::registry::ActionHandler;
use crate::web::{youtube_search_url, WebLookup};

pub struct PlayHandler {
    opener: Arc<dyn Opener>,
    web: Arc<dyn WebLookup>,
}

impl PlayHandler {
    pub fn new(opener: Arc<dyn Opener>, web: Arc<dyn WebLookup>) -> Self {
        Self { opener, web }
    }
}

#[async_trait]
impl ActionHandler for PlayHandler {
    /// Succeeds once the browser has been asked to open the page; playback
    /// itself is not verified.
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        let url = match self.web.top_video(argument).await {
            Ok(Some(url)) => url,
            Ok(None) => youtube_search_url(argument),
            Err(e) => {
                warn!(error = %e, "Video lookup failed, opening search page");
                youtube_search_url(argument)
            }
        };

        self.opener.open_url(url.as_str()).await?;
        info!(query = %argument, url = %url, "Playback requested");
        Ok(format!("Playing {}", argument))
    }
}
