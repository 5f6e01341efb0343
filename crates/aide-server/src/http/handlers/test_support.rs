//! Fakes for handler tests.

use std::path::Path;
use std::sync::Arc;

use aide_core::{CoreError, IntentClassifier, Responder};
use aide_dispatch::{ActionHandler, ActionRegistry, Dispatcher, HandlerError, Opener, PlatformError};
use async_trait::async_trait;

use crate::state::AppState;

/// Splits on `;`; the instruction `fail` errors.
struct SplitClassifier;

#[async_trait]
impl IntentClassifier for SplitClassifier {
    async fn classify(&self, instruction: &str) -> Result<Vec<String>, CoreError> {
        if instruction == "fail" {
            return Err(CoreError::Classification("model unavailable".to_string()));
        }
        Ok(instruction.split(';').map(|s| s.trim().to_string()).collect())
    }
}

struct PrefixResponder;

#[async_trait]
impl Responder for PrefixResponder {
    async fn respond(&self, query: &str, _realtime: bool, _context: &str) -> Result<String, CoreError> {
        Ok(format!("Reply: {}", query))
    }
}

struct NoopPlay;

#[async_trait]
impl ActionHandler for NoopPlay {
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        Ok(format!("Playing {}", argument))
    }
}

struct NullOpener;

#[async_trait]
impl Opener for NullOpener {
    async fn open_url(&self, _url: &str) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn open_path(&self, _path: &Path) -> Result<(), PlatformError> {
        Ok(())
    }
}

/// State with fake collaborators; reminders go under `dir`.
pub fn test_state(dir: &Path) -> Arc<AppState> {
    let registry = ActionRegistry::new().with_handler(aide_core::Category::Play, NoopPlay);
    let dispatcher = Dispatcher::new(Arc::new(SplitClassifier), Arc::new(PrefixResponder), registry);
    AppState::new(Arc::new(dispatcher), Arc::new(NullOpener), dir.join("reminders"))
}
