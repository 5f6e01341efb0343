//! System-control commands and magnitude extraction.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Magnitude applied when a system command carries no number.
pub const DEFAULT_MAGNITUDE: u32 = 10;

/// Largest change a single command can request.
pub const MAX_MAGNITUDE: u32 = 100;

/// A parsed `system` sub-instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SystemCommand {
    /// Change master volume by `delta` percentage points.
    Volume { delta: i32 },
    /// Change display brightness by `delta` percentage points.
    Brightness { delta: i32 },
    /// Toggle the microphone mute state.
    ToggleMic,
}

impl SystemCommand {
    /// Parse the argument of a `system` sub-instruction.
    ///
    /// Returns `None` if the text names no supported control.
    pub fn parse(argument: &str) -> Option<Self> {
        let text = argument.to_lowercase();
        let magnitude = || signed(extract_magnitude(&text).unwrap_or(DEFAULT_MAGNITUDE));

        if text.contains("volume up") {
            Some(Self::Volume { delta: magnitude() })
        } else if text.contains("volume down") {
            Some(Self::Volume { delta: -magnitude() })
        } else if text.contains("brightness up") {
            Some(Self::Brightness { delta: magnitude() })
        } else if text.contains("brightness down") {
            Some(Self::Brightness { delta: -magnitude() })
        } else if text.contains("mute mic") {
            // also matches "unmute mic"; the platform call is a toggle
            Some(Self::ToggleMic)
        } else {
            None
        }
    }

    /// Absolute magnitude of the change, if the command carries one.
    pub fn magnitude(&self) -> Option<u32> {
        match self {
            Self::Volume { delta } | Self::Brightness { delta } => Some(delta.unsigned_abs()),
            Self::ToggleMic => None,
        }
    }
}

fn signed(magnitude: u32) -> i32 {
    magnitude.min(MAX_MAGNITUDE) as i32
}

fn magnitude_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\s*%?").expect("magnitude pattern is valid"))
}

/// Extract the trailing integer (optionally followed by `%`) from `text`.
pub fn extract_magnitude(text: &str) -> Option<u32> {
    magnitude_pattern()
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
}
