//! Aide host process
//!
//! Wires the LLM collaborators, the platform effects and the memory store
//! into one [`Dispatcher`], then exposes it over HTTP ([`http`]) or an
//! interactive chat loop ([`repl`]).

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod repl;
pub mod state;

use std::sync::Arc;

use aide_core::{ContextStore, NoContext};
use aide_dispatch::{ActionRegistry, Dispatcher, HandlerError, Platform, WebClient};
use aide_llm::{Chatbot, ContentWriter, LlmClassifier, LlmClient};
use tracing::{info, warn};

pub use config::Config;
pub use error::ApiError;
pub use memory::HttpContextStore;
pub use state::AppState;

/// Build the production dispatcher from configuration.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher, HandlerError> {
    if config.llm_api_key.is_empty() {
        warn!("No LLM API key configured, set AIDE_LLM_API_KEY or GROQ_API_KEY");
    }

    let client = LlmClient::new(config.llm_api_key.clone())
        .with_base_url(config.llm_base_url.clone())
        .with_model(config.llm_model.clone());

    let web = Arc::new(WebClient::new()?);
    let chatbot = Chatbot::new(client.clone(), config.assistant_name.clone(), config.user_name.clone())
        .with_snippets(web.clone());
    let classifier = LlmClassifier::new(client.clone());
    let writer = ContentWriter::from_client(client);

    let platform = Platform::system();
    let registry = ActionRegistry::standard(&platform, web, Arc::new(writer), config.data_dir.clone());

    let context: Arc<dyn ContextStore> = match &config.memory_api_url {
        Some(url) => {
            info!(url = %url, "Using memory API");
            Arc::new(HttpContextStore::new(url, config.user_name.clone()).with_token(config.memory_api_token.clone()))
        }
        None => Arc::new(NoContext),
    };

    info!(
        model = %config.llm_model,
        handlers = registry.len(),
        timeout = ?config.handler_timeout(),
        "Dispatcher ready"
    );

    Ok(Dispatcher::new(Arc::new(classifier), Arc::new(chatbot), registry)
        .with_context_store(context)
        .with_user_id(config.user_id.clone())
        .with_handler_timeout(config.handler_timeout()))
}
