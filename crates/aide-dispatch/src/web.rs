//! Web lookups used by `open`, `play` and real-time answers.

use std::sync::OnceLock;
use std::time::Duration;

use aide_core::{CoreError, SnippetSource};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use tracing::{debug, info};

use crate::error::HandlerError;

/// Desktop browser user agent; the search pages serve stripped markup otherwise.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const GOOGLE_SEARCH: &str = "https://www.google.com/search";
const YOUTUBE_SEARCH: &str = "https://www.youtube.com/results";
const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch";
const DUCKDUCKGO_HTML: &str = "https://html.duckduckgo.com/html/";

fn url_with_query(base: &str, key: &str, value: &str) -> Url {
    match Url::parse_with_params(base, &[(key, value)]) {
        Ok(url) => url,
        // The bases are constants; parsing them cannot fail.
        Err(_) => unreachable!("invalid base url {}", base),
    }
}

/// Google search page for `query`.
pub fn google_search_url(query: &str) -> Url {
    url_with_query(GOOGLE_SEARCH, "q", query)
}

/// YouTube search page for `query`.
pub fn youtube_search_url(query: &str) -> Url {
    url_with_query(YOUTUBE_SEARCH, "search_query", query)
}

/// YouTube watch page for a video id.
pub fn youtube_watch_url(video_id: &str) -> Url {
    url_with_query(YOUTUBE_WATCH, "v", video_id)
}

fn anchor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<a\s[^>]*>").expect("anchor pattern is valid"))
}

fn href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"href="([^"]+)""#).expect("href pattern is valid"))
}

fn video_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""videoId":"([\w-]{11})""#).expect("video pattern is valid"))
}

fn snippet_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#).expect("snippet pattern is valid")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// First organic result link on a Google results page.
///
/// Result anchors carry `jsname="UWckNb"`.
pub fn extract_first_link(html: &str) -> Option<String> {
    anchor_pattern()
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| tag.contains(r#"jsname="UWckNb""#))
        .find_map(|tag| href_pattern().captures(tag))
        .map(|caps| decode_entities(&caps[1]))
        .filter(|href| href.starts_with("http"))
}

/// First video id on a YouTube results page.
pub fn extract_video_id(html: &str) -> Option<String> {
    video_pattern()
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Plain-text result snippets from a DuckDuckGo HTML results page.
pub fn extract_snippets(html: &str, limit: usize) -> Vec<String> {
    snippet_pattern()
        .captures_iter(html)
        .map(|caps| {
            let text = tag_pattern().replace_all(&caps[1], "");
            decode_entities(text.split_whitespace().collect::<Vec<_>>().join(" ").as_str())
        })
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect()
}

/// Search lookups the `open` and `play` handlers fall back on.
#[async_trait]
pub trait WebLookup: Send + Sync {
    /// First search result link for `query`, if any.
    async fn first_link(&self, query: &str) -> Result<Option<String>, HandlerError>;

    /// Watch URL of the first video for `query`, if any.
    async fn top_video(&self, query: &str) -> Result<Option<Url>, HandlerError>;
}

/// HTTP client for the search pages.
#[derive(Debug, Clone)]
pub struct WebClient {
    http: reqwest::Client,
}

impl WebClient {
    /// Create a client with a browser user agent and a 15 second timeout.
    pub fn new() -> Result<Self, HandlerError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { http })
    }

    async fn fetch(&self, url: Url) -> Result<String, HandlerError> {
        debug!(url = %url, "Fetching page");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl WebLookup for WebClient {
    async fn first_link(&self, query: &str) -> Result<Option<String>, HandlerError> {
        let html = self.fetch(google_search_url(query)).await?;
        let link = extract_first_link(&html);
        info!(query = %query, found = link.is_some(), "Resolved first search link");
        Ok(link)
    }

    async fn top_video(&self, query: &str) -> Result<Option<Url>, HandlerError> {
        let html = self.fetch(youtube_search_url(query)).await?;
        let video = extract_video_id(&html).map(|id| youtube_watch_url(&id));
        info!(query = %query, found = video.is_some(), "Resolved top video");
        Ok(video)
    }
}

#[async_trait]
impl SnippetSource for WebClient {
    async fn snippets(&self, query: &str, limit: usize) -> Result<Vec<String>, CoreError> {
        let url = url_with_query(DUCKDUCKGO_HTML, "q", query);
        let html = self
            .fetch(url)
            .await
            .map_err(|e| CoreError::Lookup(e.to_string()))?;
        Ok(extract_snippets(&html, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_urls_are_encoded() {
        assert_eq!(
            google_search_url("rust & tokio").as_str(),
            "https://www.google.com/search?q=rust+%26+tokio"
        );
        assert_eq!(
            youtube_search_url("lofi beats").as_str(),
            "https://www.youtube.com/results?search_query=lofi+beats"
        );
        assert_eq!(
            youtube_watch_url("dQw4w9WgXcQ").as_str(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_extract_first_link() {
        let html = r#"
            <a href="/preferences">Settings</a>
            <a jsname="UWckNb" class="zReHs" href="https://www.spotify.com/download/?a=1&amp;b=2" data-ved="x">
            <a jsname="UWckNb" href="https://second.example">
        "#;
        assert_eq!(
            extract_first_link(html).as_deref(),
            Some("https://www.spotify.com/download/?a=1&b=2")
        );
        assert_eq!(extract_first_link("<a href=\"https://x\">"), None);
    }

    #[test]
    fn test_extract_video_id() {
        let html = r#"{"itemSectionRenderer":{"contents":[{"videoRenderer":{"videoId":"jfKfPfyJRdk","thumbnail":{}}}]}}"#;
        assert_eq!(extract_video_id(html).as_deref(), Some("jfKfPfyJRdk"));
        assert_eq!(extract_video_id("{}"), None);
    }

    #[test]
    fn test_extract_snippets() {
        let html = r#"
            <a class="result__snippet" href="x">Porto is <b>sunny</b> today,
              21&deg;C</a>
            <a class="result__snippet" href="y">Rain &amp; wind tomorrow</a>
            <a class="result__snippet" href="z">third</a>
        "#;
        let snippets = extract_snippets(html, 2);
        assert_eq!(snippets, vec!["Porto is sunny today, 21&deg;C", "Rain & wind tomorrow"]);
    }
}
