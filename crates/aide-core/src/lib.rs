//! Aide Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Operating-system effects
//! - Runtime specifics
//!
//! It also defines the collaborator traits (classifier, responder, content
//! generator, context store) that the dispatcher consumes and the LLM and
//! server crates implement.

pub mod action;
pub mod category;
pub mod chat;
pub mod collab;
pub mod error;
pub mod ids;
pub mod instruction;
pub mod memory;
pub mod outcome;
pub mod status;
pub mod system;
pub mod text;

// Re-export commonly used types
pub use action::ActionResult;
pub use category::{Category, EXIT_SIGNAL, PREFIXES};
pub use chat::{ChatMessage, ChatRole};
pub use collab::{ContentGenerator, ContextStore, IntentClassifier, NoContext, Responder, SnippetSource};
pub use error::CoreError;
pub use ids::DispatchId;
pub use instruction::{DispatchBatch, TaggedSubInstruction};
pub use memory::{MemoryEntry, MemoryKind};
pub use outcome::DispatchOutcome;
pub use status::{AssistantStatus, DispatchPhase};
pub use system::{extract_magnitude, SystemCommand, DEFAULT_MAGNITUDE, MAX_MAGNITUDE};
