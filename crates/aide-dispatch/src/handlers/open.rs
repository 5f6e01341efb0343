//! `open`: launch a local application, else open its first web result.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::HandlerError;
use crate::fuzzy;
use crate::platform::{Apps, Opener};
use crate::registry::ActionHandler;
use crate::web::WebLookup;

pub struct OpenHandler {
    apps: Arc<dyn Apps>,
    opener: Arc<dyn Opener>,
    web: Arc<dyn WebLookup>,
}

impl OpenHandler {
    pub fn new(apps: Arc<dyn Apps>, opener: Arc<dyn Opener>, web: Arc<dyn WebLookup>) -> Self {
        Self { apps, opener, web }
    }

    async fn launch_local(&self, argument: &str) -> Result<String, HandlerError> {
        let installed = self.apps.installed().await?;
        let name = fuzzy::closest_match(argument, &installed)
            .ok_or_else(|| HandlerError::AppNotFound(argument.to_string()))?
            .to_string();

        self.apps.launch(&name).await?;
        info!(requested = %argument, app = %name, "Application launched");
        Ok(name)
    }
}

#[async_trait]
impl ActionHandler for OpenHandler {
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        match self.launch_local(argument).await {
            Ok(name) => return Ok(format!("Opened {}", name)),
            Err(e) => debug!(error = %e, "No local application, trying the web"),
        }

        let link = self
            .web
            .first_link(argument)
            .await?
            .ok_or_else(|| HandlerError::AppNotFound(argument.to_string()))?;

        self.opener.open_url(&link).await?;
        info!(requested = %argument, link = %link, "Opened first search result");
        Ok(format!("Opened {} in the browser", link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{fake_platform, platform_from, FakeSystem, FakeWeb};

    #[tokio::test]
    async fn test_launches_closest_installed_app() {
        let (platform, system) = fake_platform(&["org.gnome.Calculator", "firefox"]);
        let handler = OpenHandler::new(platform.apps, platform.opener, Arc::new(FakeWeb::default()));

        let message = handler.run("calculator").await.unwrap();
        assert_eq!(message, "Opened org.gnome.Calculator");
        assert_eq!(system.launched(), vec!["org.gnome.Calculator".to_string()]);
        assert!(system.urls().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_first_web_result() {
        let (platform, system) = fake_platform(&["firefox"]);
        let web = FakeWeb {
            link: Some("https://www.spotify.com/".to_string()),
            ..Default::default()
        };
        let handler = OpenHandler::new(platform.apps, platform.opener, Arc::new(web));

        handler.run("spotify").await.unwrap();
        assert!(system.launched().is_empty());
        assert_eq!(system.urls(), vec!["https://www.spotify.com/".to_string()]);
    }

    #[tokio::test]
    async fn test_launch_failure_falls_back_too() {
        let (platform, system) = platform_from(FakeSystem {
            fail_launch: true,
            ..FakeSystem::with_apps(&["spotify"])
        });
        let web = FakeWeb {
            link: Some("https://open.spotify.com/".to_string()),
            ..Default::default()
        };
        let handler = OpenHandler::new(platform.apps, platform.opener, Arc::new(web));

        assert!(handler.run("spotify").await.is_ok());
        assert_eq!(system.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_found_is_an_error() {
        let (platform, _) = fake_platform(&[]);
        let handler = OpenHandler::new(platform.apps, platform.opener, Arc::new(FakeWeb::default()));
        assert!(matches!(handler.run("zzz").await, Err(HandlerError::AppNotFound(_))));

        let (platform, _) = fake_platform(&[]);
        let offline = FakeWeb {
            offline: true,
            ..Default::default()
        };
        let handler = OpenHandler::new(platform.apps, platform.opener, Arc::new(offline));
        assert!(matches!(handler.run("zzz").await, Err(HandlerError::Lookup(_))));
    }
}
