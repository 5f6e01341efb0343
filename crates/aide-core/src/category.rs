//! Sub-instruction categories and the ordered prefix table that recognises them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of one classified sub-instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Launch a local application (or its website).
    Open,
    /// Close a running application.
    Close,
    /// Play media on a video platform.
    Play,
    /// Generate written content and open it in a text viewer.
    Content,
    /// Open a web search for the argument.
    GoogleSearch,
    /// Open a video-platform search for the argument.
    YoutubeSearch,
    /// General conversation.
    General,
    /// Conversation that needs up-to-date information.
    Realtime,
    /// Volume, brightness or microphone control.
    System,
    /// Calendar reminder. Created through the reminder command, never
    /// parsed from classifier output.
    Reminder,
    /// Shutdown request.
    Exit,
    /// Matched no known prefix.
    Unrecognized,
}

/// Recognised prefixes in match order.
///
/// First match wins, so a multi-word prefix must be listed before any shorter
/// prefix it could be shadowed by.
pub const PREFIXES: &[(&str, Category)] = &[
    ("open ", Category::Open),
    ("close ", Category::Close),
    ("play ", Category::Play),
    ("content ", Category::Content),
    ("google search ", Category::GoogleSearch),
    ("youtube search ", Category::YoutubeSearch),
    ("general ", Category::General),
    ("realtime ", Category::Realtime),
    ("system ", Category::System),
];

/// Literal emitted by the classifier when the user wants to quit.
pub const EXIT_SIGNAL: &str = "exit";

impl Category {
    /// Tag name as emitted by the classifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Play => "play",
            Self::Content => "content",
            Self::GoogleSearch => "google_search",
            Self::YoutubeSearch => "youtube_search",
            Self::General => "general",
            Self::Realtime => "realtime",
            Self::System => "system",
            Self::Reminder => "reminder",
            Self::Exit => "exit",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Returns true for categories executed as concurrent automation tasks.
    pub fn is_automation(&self) -> bool {
        matches!(
            self,
            Self::Open
                | Self::Close
                | Self::Play
                | Self::Content
                | Self::GoogleSearch
                | Self::YoutubeSearch
                | Self::System
        )
    }

    /// Returns true for categories answered by the conversational responder.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Self::General | Self::Realtime)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
