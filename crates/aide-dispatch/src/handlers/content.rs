//! `content`: generate text, save it and open it.

use std::path::PathBuf;
use std::sync::Arc;

use aide_core::text::sanitize_filename;
use aide_core::ContentGenerator;
use async_trait::async_trait;
use tracing::{info, trace, warn};

use crate::error::HandlerError;
use crate::platform::Opener;
use crate::registry::ActionHandler;

pub struct ContentHandler {
    generator: Arc<dyn ContentGenerator>,
    opener: Arc<dyn Opener>,
    dir: PathBuf,
}

impl ContentHandler {
    pub fn new(generator: Arc<dyn ContentGenerator>, opener: Arc<dyn Opener>, dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            opener,
            dir: dir.into(),
        }
    }

    /// Target file for a topic: `<dir>/<sanitized topic>.txt`.
    pub fn path_for(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", sanitize_filename(topic)))
    }
}

#[async_trait]
impl ActionHandler for ContentHandler {
    /// Nothing is written unless generation completes.
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        let topic = argument.trim();
        let on_chunk = |piece: &str| trace!(chars = piece.len(), "Content chunk");

        let text = self
            .generator
            .generate(topic, &on_chunk)
            .await
            .map_err(|e| HandlerError::Generation(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(topic);
        tokio::fs::write(&path, text.as_bytes()).await?;
        info!(topic = %topic, path = %path.display(), chars = text.len(), "Content saved");

        if let Err(e) = self.opener.open_path(&path).await {
            warn!(error = %e, path = %path.display(), "Could not open saved content");
        }

        Ok(format!("Content saved to {}", path.display()))
    }
}
