//! Tag parsing: classifier lines to tagged sub-instructions and batches.

use serde::{Deserialize, Serialize};

use crate::category::{Category, EXIT_SIGNAL, PREFIXES};

/// One classified unit of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSubInstruction {
    /// Category recognised from the prefix.
    pub category: Category,

    /// Remainder after the prefix, original casing preserved.
    /// Empty only for `Exit`; the whole line for `Unrecognized`.
    pub argument: String,
}

impl TaggedSubInstruction {
    /// Create a new sub-instruction.
    pub fn new(category: Category, argument: impl Into<String>) -> Self {
        Self {
            category,
            argument: argument.into(),
        }
    }

    /// Parse one classifier line.
    ///
    /// Returns `None` when the line is suppressed: an `open` whose target is
    /// `it` or mentions `file` has no resolvable target.
    pub fn parse(raw: &str) -> Option<Self> {
        let line = raw.trim();

        if line.eq_ignore_ascii_case(EXIT_SIGNAL) {
            return Some(Self::new(Category::Exit, ""));
        }

        for (prefix, category) in PREFIXES {
            let matches = line
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
            if !matches {
                continue;
            }

            let argument = line[prefix.len()..].trim();
            if argument.is_empty() {
                break;
            }

            if *category == Category::Open && is_unresolvable_open(argument) {
                return None;
            }

            return Some(Self::new(*category, argument));
        }

        Some(Self::new(Category::Unrecognized, line))
    }
}

fn is_unresolvable_open(argument: &str) -> bool {
    argument.eq_ignore_ascii_case("it") || argument.to_lowercase().contains("file")
}

/// Ordered sub-instructions derived from one instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchBatch {
    items: Vec<TaggedSubInstruction>,
    suppressed: usize,
}

impl DispatchBatch {
    /// Build a batch from classifier output, preserving its order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = Self::default();
        for line in lines {
            match TaggedSubInstruction::parse(line.as_ref()) {
                Some(item) => batch.items.push(item),
                None => batch.suppressed += 1,
            }
        }
        batch
    }

    /// All parsed sub-instructions in classifier order.
    pub fn items(&self) -> &[TaggedSubInstruction] {
        &self.items
    }

    /// Number of lines dropped by the open guard.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Returns true if nothing survived parsing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sub-instructions executed as automation tasks.
    pub fn automations(&self) -> impl Iterator<Item = &TaggedSubInstruction> {
        self.items.iter().filter(|i| i.category.is_automation())
    }

    /// Lines that matched no prefix.
    pub fn unrecognized(&self) -> impl Iterator<Item = &TaggedSubInstruction> {
        self.items
            .iter()
            .filter(|i| i.category == Category::Unrecognized)
    }

    /// Returns true if the batch carries the exit signal.
    pub fn has_exit(&self) -> bool {
        self.items.iter().any(|i| i.category == Category::Exit)
    }

    /// Returns true if any conversational ask needs real-time data.
    pub fn wants_realtime(&self) -> bool {
        self.items.iter().any(|i| i.category == Category::Realtime)
    }

    /// All general/realtime arguments joined with `" and "`.
    pub fn merged_query(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .items
            .iter()
            .filter(|i| i.category.is_conversational())
            .map(|i| i.argument.as_str())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" and "))
        }
    }
}
