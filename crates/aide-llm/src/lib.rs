//! Chat-completion client for Aide
//!
//! This crate talks to any OpenAI-compatible chat-completions endpoint (Groq
//! by default) and provides the LLM-backed collaborators the dispatcher
//! consumes:
//!
//! - [`LlmClassifier`] splits an instruction into tagged lines
//! - [`Chatbot`] answers merged conversational queries
//! - [`ContentWriter`] streams long-form content
//!
//! # Example
//!
//! ```rust,no_run
//! use aide_core::Responder;
//! use aide_llm::{Chatbot, LlmClient};
//!
//! async fn ask() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LlmClient::new("gsk-...").with_model("llama-3.3-70b-versatile");
//!     let chatbot = Chatbot::new(client, "Aide", "sam");
//!
//!     let answer = chatbot.respond("What is the capital of France?", false, "").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

mod chatbot;
mod classifier;
mod client;
mod content;
mod error;
mod types;

pub use chatbot::{realtime_information, Chatbot};
pub use classifier::{parse_decision, LlmClassifier};
pub use client::{ChatBackend, LlmClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use content::{ContentWriter, CONTENT_TEMPERATURE};
pub use error::LlmError;
pub use types::{parse_sse_line, ChatCompletionChunk, ChatCompletionRequest, SseLine, WireMessage};
