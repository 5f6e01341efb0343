//! Host configuration.
//!
//! Built in three layers: [`Config::default`], then `AIDE_*` environment
//! variables (plus `GROQ_API_KEY`), then command-line flags applied by the
//! binary. Variables missing from the process environment are read from a
//! `.env` file in the working directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aide_llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use tracing::warn;

/// Host configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub bind_addr: String,

    /// Chat-completions API root.
    pub llm_base_url: String,

    /// Chat model name.
    pub llm_model: String,

    /// Chat-completions API key.
    pub llm_api_key: String,

    /// Memory API root. Conversations run without memory when unset.
    pub memory_api_url: Option<String>,

    /// Bearer token for the memory API.
    pub memory_api_token: Option<String>,

    /// User whose memories are read and appended.
    pub user_id: String,

    /// Name the assistant answers to.
    pub assistant_name: String,

    /// How the assistant addresses the user.
    pub user_name: String,

    /// Generated content goes here; reminders under `reminders/`.
    pub data_dir: PathBuf,

    /// Per-handler time limit in seconds. Unset waits forever.
    pub handler_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8700".to_string(),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_api_key: String::new(),
            memory_api_url: None,
            memory_api_token: None,
            user_id: "default".to_string(),
            assistant_name: "Aide".to_string(),
            user_name: "User".to_string(),
            data_dir: dirs::data_dir()
                .map(|dir| dir.join("aide"))
                .unwrap_or_else(|| PathBuf::from("data")),
            handler_timeout_secs: None,
        }
    }
}

/// Key/value pairs from a dotenv file. A missing file gives no entries.
pub fn dotenv_entries(path: &Path) -> HashMap<String, String> {
    let Ok(entries) = dotenv::from_path_iter(path) else {
        return HashMap::new();
    };
    entries
        .filter_map(|entry| match entry {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping malformed dotenv line");
                None
            }
        })
        .collect()
}

impl Config {
    /// Defaults overlaid with the process environment, falling back to the
    /// entries of the dotenv file at `path`.
    pub fn load(path: &Path) -> Self {
        let file = dotenv_entries(path);
        Self::default().overlay_env(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Overlay values found by `lookup`. Empty values are ignored.
    pub fn overlay_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("AIDE_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = var("AIDE_LLM_BASE_URL") {
            self.llm_base_url = v;
        }
        if let Some(v) = var("AIDE_LLM_MODEL") {
            self.llm_model = v;
        }
        if let Some(v) = var("AIDE_LLM_API_KEY").or_else(|| var("GROQ_API_KEY")) {
            self.llm_api_key = v;
        }
        if let Some(v) = var("AIDE_MEMORY_API_URL") {
            self.memory_api_url = Some(v);
        }
        if let Some(v) = var("AIDE_MEMORY_API_TOKEN") {
            self.memory_api_token = Some(v);
        }
        if let Some(v) = var("AIDE_USER_ID") {
            self.user_id = v;
        }
        if let Some(v) = var("AIDE_ASSISTANT_NAME") {
            self.assistant_name = v;
        }
        if let Some(v) = var("AIDE_USER_NAME") {
            self.user_name = v;
        }
        if let Some(v) = var("AIDE_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("AIDE_HANDLER_TIMEOUT_SECS") {
            match v.trim().parse() {
                Ok(secs) => self.handler_timeout_secs = Some(secs),
                Err(_) => warn!(value = %v, "Ignoring invalid AIDE_HANDLER_TIMEOUT_SECS"),
            }
        }

        self
    }

    /// Per-handler timeout, if configured. Zero means none.
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Directory for reminder files.
    pub fn reminders_dir(&self) -> PathBuf {
        self.data_dir.join("reminders")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8700");
        assert_eq!(config.llm_model, DEFAULT_MODEL);
        assert!(config.memory_api_url.is_none());
        assert!(config.handler_timeout().is_none());
    }

    #[test]
    fn test_env_overlay() {
        let config = Config::default().overlay_env(env(&[
            ("GROQ_API_KEY", "gsk-1"),
            ("AIDE_USER_NAME", "Sam"),
            ("AIDE_DATA_DIR", "/tmp/aide-data"),
            ("AIDE_HANDLER_TIMEOUT_SECS", "30"),
            ("AIDE_MEMORY_API_URL", ""),
        ]));

        assert_eq!(config.llm_api_key, "gsk-1");
        assert_eq!(config.user_name, "Sam");
        assert_eq!(config.reminders_dir(), PathBuf::from("/tmp/aide-data/reminders"));
        assert_eq!(config.handler_timeout(), Some(Duration::from_secs(30)));
        assert!(config.memory_api_url.is_none());
    }

    #[test]
    fn test_explicit_key_wins_over_groq_key() {
        let config = Config::default().overlay_env(env(&[
            ("GROQ_API_KEY", "gsk-1"),
            ("AIDE_LLM_API_KEY", "sk-2"),
        ]));
        assert_eq!(config.llm_api_key, "sk-2");
    }

    #[test]
    fn test_dotenv_file_fills_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# assistant settings\nAIDE_ASSISTANT_NAME=Jarvis\nAIDE_USER_NAME=\"Sam Doe\"\n",
        )
        .unwrap();

        let entries = dotenv_entries(&path);
        assert_eq!(entries.get("AIDE_ASSISTANT_NAME").map(String::as_str), Some("Jarvis"));

        let config = Config::default().overlay_env(|key| entries.get(key).cloned());
        assert_eq!(config.assistant_name, "Jarvis");
        assert_eq!(config.user_name, "Sam Doe");
    }

    #[test]
    fn test_load_reads_dotenv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "AIDE_HANDLER_TIMEOUT_SECS=12\n").unwrap();

        let config = Config::load(&path);
        assert_eq!(config.handler_timeout(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_missing_dotenv_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(dotenv_entries(&dir.path().join(".env")).is_empty());
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let config = Config::default().overlay_env(env(&[("AIDE_HANDLER_TIMEOUT_SECS", "soon")]));
        assert!(config.handler_timeout_secs.is_none());
    }
}
