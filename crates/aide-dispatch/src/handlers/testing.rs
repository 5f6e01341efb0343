//! In-memory fakes for handler and dispatcher tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aide_core::{ContentGenerator, CoreError};
use async_trait::async_trait;
use reqwest::Url;

use crate::error::{HandlerError, PlatformError};
use crate::platform::{Apps, Backlight, Mixer, Opener, Platform};
use crate::web::{youtube_watch_url, WebLookup};

/// Records every effect instead of performing it.
#[derive(Default)]
pub struct FakeSystem {
    pub installed: Vec<String>,
    pub launched: Mutex<Vec<String>>,
    pub closed: Mutex<Vec<String>>,
    pub urls: Mutex<Vec<String>>,
    pub paths: Mutex<Vec<PathBuf>>,
    pub volume: Mutex<f32>,
    pub brightness: Mutex<u8>,
    pub mic_toggles: AtomicUsize,
    pub fail_launch: bool,
    pub fail_close: bool,
    pub broken_backlight: bool,
}

impl FakeSystem {
    pub fn with_apps(apps: &[&str]) -> Self {
        Self {
            installed: apps.iter().map(|a| a.to_string()).collect(),
            volume: Mutex::new(0.5),
            brightness: Mutex::new(50),
            ..Default::default()
        }
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }

    pub fn volume_level(&self) -> f32 {
        *self.volume.lock().unwrap()
    }

    pub fn mic_toggles(&self) -> usize {
        self.mic_toggles.load(Ordering::SeqCst)
    }
}

fn refused(program: &str) -> PlatformError {
    PlatformError::CommandFailed {
        program: program.to_string(),
        status: "exit status: 1".to_string(),
        stderr: "refused".to_string(),
    }
}

#[async_trait]
impl Apps for FakeSystem {
    async fn installed(&self) -> Result<Vec<String>, PlatformError> {
        Ok(self.installed.clone())
    }

    async fn launch(&self, name: &str) -> Result<(), PlatformError> {
        if self.fail_launch {
            return Err(refused("launch"));
        }
        self.launched.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn close(&self, name: &str) -> Result<(), PlatformError> {
        if self.fail_close {
            return Err(refused("close"));
        }
        self.closed.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

#[async_trait]
impl Opener for FakeSystem {
    async fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn open_path(&self, path: &Path) -> Result<(), PlatformError> {
        self.paths.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[async_trait]
impl Mixer for FakeSystem {
    async fn volume(&self) -> Result<f32, PlatformError> {
        Ok(*self.volume.lock().unwrap())
    }

    async fn set_volume(&self, level: f32) -> Result<(), PlatformError> {
        *self.volume.lock().unwrap() = level;
        Ok(())
    }

    async fn toggle_mic(&self) -> Result<(), PlatformError> {
        self.mic_toggles.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Backlight for FakeSystem {
    async fn brightness(&self) -> Result<u8, PlatformError> {
        if self.broken_backlight {
            return Err(PlatformError::Unsupported("brightness control"));
        }
        Ok(*self.brightness.lock().unwrap())
    }

    async fn set_brightness(&self, percent: u8) -> Result<(), PlatformError> {
        *self.brightness.lock().unwrap() = percent;
        Ok(())
    }
}

/// A platform whose every provider is the same [`FakeSystem`].
pub fn platform_from(system: FakeSystem) -> (Platform, Arc<FakeSystem>) {
    let system = Arc::new(system);
    let platform = Platform {
        apps: system.clone(),
        opener: system.clone(),
        mixer: system.clone(),
        backlight: system.clone(),
    };
    (platform, system)
}

pub fn fake_platform(apps: &[&str]) -> (Platform, Arc<FakeSystem>) {
    platform_from(FakeSystem::with_apps(apps))
}

/// Canned search results.
#[derive(Default)]
pub struct FakeWeb {
    pub link: Option<String>,
    pub video_id: Option<String>,
    pub offline: bool,
}

#[async_trait]
impl WebLookup for FakeWeb {
    async fn first_link(&self, _query: &str) -> Result<Option<String>, HandlerError> {
        if self.offline {
            return Err(HandlerError::Lookup("offline".to_string()));
        }
        Ok(self.link.clone())
    }

    async fn top_video(&self, _query: &str) -> Result<Option<Url>, HandlerError> {
        if self.offline {
            return Err(HandlerError::Lookup("offline".to_string()));
        }
        Ok(self.video_id.as_deref().map(youtube_watch_url))
    }
}

/// Streams a fixed text word by word, or fails half way through.
pub struct FakeContent {
    text: String,
    fail_midway: bool,
}

impl FakeContent {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fail_midway: false,
        }
    }

    pub fn failing(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fail_midway: true,
        }
    }
}

#[async_trait]
impl ContentGenerator for FakeContent {
    async fn generate(
        &self,
        _topic: &str,
        on_chunk: &(dyn for<'c> Fn(&'c str) + Send + Sync),
    ) -> Result<String, CoreError> {
        let words: Vec<&str> = self.text.split_inclusive(' ').collect();
        for (i, word) in words.iter().enumerate() {
            if self.fail_midway && i == words.len() / 2 {
                return Err(CoreError::Generation("connection reset".to_string()));
            }
            on_chunk(word);
        }
        Ok(self.text.clone())
    }
}
