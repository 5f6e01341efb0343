//! `close`: stop a running application.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::HandlerError;
use crate::fuzzy;
use crate::platform::Apps;
use crate::registry::ActionHandler;

pub struct CloseHandler {
    apps: Arc<dyn Apps>,
}

impl CloseHandler {
    pub fn new(apps: Arc<dyn Apps>) -> Self {
        Self { apps }
    }

    async fn resolve(&self, argument: &str) -> Option<String> {
        match self.apps.installed().await {
            Ok(installed) => fuzzy::closest_match(argument, &installed).map(str::to_string),
            Err(e) => {
                warn!(error = %e, "Could not list applications");
                None
            }
        }
    }
}

#[async_trait]
impl ActionHandler for CloseHandler {
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        // Chrome is never closed.
        if argument.to_lowercase().contains("chrome") {
            info!(requested = %argument, "Skipping close for Chrome");
            return Ok(format!("Left {} running", argument));
        }

        let matched = self.resolve(argument).await;
        if let Some(name) = matched.as_deref().filter(|name| *name != argument) {
            match self.apps.close(name).await {
                Ok(()) => {
                    info!(requested = %argument, app = %name, "Application closed");
                    return Ok(format!("Closed {}", name));
                }
                Err(e) => warn!(app = %name, error = %e, "Close by matched name failed"),
            }
        }

        self.apps.close(argument).await?;
        info!(app = %argument, "Application closed");
        Ok(format!("Closed {}", argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{fake_platform, platform_from, FakeSystem};

    #[tokio::test]
    async fn test_chrome_is_a_no_op() {
        let (platform, system) = fake_platform(&["google-chrome"]);
        let handler = CloseHandler::new(platform.apps);

        let message = handler.run("Google Chrome").await.unwrap();
        assert!(message.contains("running"));
        assert!(system.closed().is_empty());
    }

    #[tokio::test]
    async fn test_closes_matched_app() {
        let (platform, system) = fake_platform(&["notepad", "spotify"]);
        let handler = CloseHandler::new(platform.apps);

        handler.run("Notepad").await.unwrap();
        assert_eq!(system.closed(), vec!["notepad".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_app_uses_raw_name() {
        let (platform, system) = fake_platform(&[]);
        let handler = CloseHandler::new(platform.apps);

        handler.run("gedit").await.unwrap();
        assert_eq!(system.closed(), vec!["gedit".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let (platform, _) = platform_from(FakeSystem {
            fail_close: true,
            ..FakeSystem::with_apps(&["notepad"])
        });
        let handler = CloseHandler::new(platform.apps);
        assert!(matches!(handler.run("notepad").await, Err(HandlerError::Platform(_))));
    }
}
