//! Category to handler table.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use aide_core::{Category, ContentGenerator};
use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handlers::{
    CloseHandler, ContentHandler, OpenHandler, PlayHandler, SearchEngine, SearchHandler, SystemHandler,
};
use crate::platform::Platform;
use crate::web::WebLookup;

/// Executes one automation category's side effect.
///
/// Returns a short confirmation on success. Handlers never touch the
/// assistant status; the dispatcher turns the result into an `ActionResult`.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn run(&self, argument: &str) -> Result<String, HandlerError>;
}

/// Handlers keyed by the category they serve.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<Category, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard handler set for every automation category.
    ///
    /// Generated content is written under `data_dir`.
    pub fn standard(
        platform: &Platform,
        web: Arc<dyn WebLookup>,
        content: Arc<dyn ContentGenerator>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new()
            .with_handler(
                Category::Open,
                OpenHandler::new(platform.apps.clone(), platform.opener.clone(), web.clone()),
            )
            .with_handler(Category::Close, CloseHandler::new(platform.apps.clone()))
            .with_handler(Category::Play, PlayHandler::new(platform.opener.clone(), web))
            .with_handler(
                Category::Content,
                ContentHandler::new(content, platform.opener.clone(), data_dir),
            )
            .with_handler(
                Category::GoogleSearch,
                SearchHandler::new(SearchEngine::Google, platform.opener.clone()),
            )
            .with_handler(
                Category::YoutubeSearch,
                SearchHandler::new(SearchEngine::Youtube, platform.opener.clone()),
            )
            .with_handler(
                Category::System,
                SystemHandler::new(platform.mixer.clone(), platform.backlight.clone()),
            )
    }

    /// Builder method to register a handler.
    pub fn with_handler(mut self, category: Category, handler: impl ActionHandler + 'static) -> Self {
        self.register(category, Arc::new(handler));
        self
    }

    /// Register or replace the handler for `category`.
    pub fn register(&mut self, category: Category, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(category, handler);
    }

    /// Handler for `category`, if one is registered.
    pub fn get(&self, category: Category) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(&category).cloned()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{fake_platform, FakeContent, FakeWeb};

    #[test]
    fn test_standard_registry_covers_automation_categories() {
        let (platform, _) = fake_platform(&[]);
        let registry = ActionRegistry::standard(
            &platform,
            Arc::new(FakeWeb::default()),
            Arc::new(FakeContent::new("text")),
            "/tmp/aide",
        );

        for (_, category) in aide_core::PREFIXES {
            assert_eq!(registry.get(*category).is_some(), category.is_automation());
        }
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_register_replaces() {
        struct Noop;

        #[async_trait]
        impl ActionHandler for Noop {
            async fn run(&self, _argument: &str) -> Result<String, HandlerError> {
                Ok(String::new())
            }
        }

        let mut registry = ActionRegistry::new().with_handler(Category::Play, Noop);
        registry.register(Category::Play, Arc::new(Noop));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(Category::Open).is_none());
    }
}
