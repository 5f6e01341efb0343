//! Memory entries served by the memory API and their rendering as chat context.

use serde::{Deserialize, Serialize};

/// Kind of stored memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Preference,
    Fact,
    Context,
}

/// A key/value memory about the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub memory_type: MemoryKind,
    pub key: String,
    pub value: String,
    #[serde(default = "default_importance")]
    pub importance: i32,
}

fn default_importance() -> i32 {
    1
}

const MAX_PREFERENCES: usize = 5;
const MAX_FACTS: usize = 5;
const MAX_CONTEXTS: usize = 3;

impl MemoryEntry {
    /// Create a new memory entry.
    pub fn new(memory_type: MemoryKind, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            memory_type,
            key: key.into(),
            value: value.into(),
            importance: default_importance(),
        }
    }
}

/// Render memories as the context block handed to the responder.
///
/// Entries are expected most-important first, as the memory API returns them.
pub fn format_context(user_name: &str, entries: &[MemoryEntry]) -> String {
    let mut parts = vec![format!("User's name: {}", user_name)];

    let of_kind = |kind: MemoryKind| entries.iter().filter(move |m| m.memory_type == kind);

    let preferences: Vec<_> = of_kind(MemoryKind::Preference).take(MAX_PREFERENCES).collect();
    if !preferences.is_empty() {
        parts.push("User preferences:".to_string());
        parts.extend(preferences.iter().map(|m| format!("- {}: {}", m.key, m.value)));
    }

    let facts: Vec<_> = of_kind(MemoryKind::Fact).take(MAX_FACTS).collect();
    if !facts.is_empty() {
        parts.push("Important facts about user:".to_string());
        parts.extend(facts.iter().map(|m| format!("- {}: {}", m.key, m.value)));
    }

    let contexts: Vec<_> = of_kind(MemoryKind::Context).take(MAX_CONTEXTS).collect();
    if !contexts.is_empty() {
        parts.push("Recent context:".to_string());
        parts.extend(contexts.iter().map(|m| format!("- {}", m.value)));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context_groups_and_limits() {
        let mut entries = vec![
            MemoryEntry::new(MemoryKind::Preference, "music_preference", "likes jazz"),
            MemoryEntry::new(MemoryKind::Fact, "occupation", "works as a nurse"),
        ];
        for i in 0..5 {
            entries.push(MemoryEntry::new(MemoryKind::Context, format!("c{}", i), format!("ctx {}", i)));
        }

        let context = format_context("sam", &entries);
        assert!(context.starts_with("User's name: sam"));
        assert!(context.contains("- music_preference: likes jazz"));
        assert!(context.contains("Important facts about user:"));
        assert!(context.contains("- ctx 2"));
        assert!(!context.contains("- ctx 3"));
    }

    #[test]
    fn test_format_context_without_memories() {
        assert_eq!(format_context("sam", &[]), "User's name: sam");
    }

    #[test]
    fn test_memory_entry_wire_format() {
        let json = r#"{"memory_type":"fact","key":"location","value":"lives in Porto"}"#;
        let entry: MemoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.memory_type, MemoryKind::Fact);
        assert_eq!(entry.importance, 1);
    }
}
