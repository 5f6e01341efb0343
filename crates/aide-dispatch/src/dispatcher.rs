//! Command dispatcher: classify, run automations concurrently, answer, report.
//!
//! One instruction moves through
//! `Idle -> Classifying -> Dispatching -> Collecting -> Responding -> Idle`,
//! or `Classifying -> Failed -> Idle` when the classifier gives nothing
//! usable. Whole instructions are serialised: a second caller waits until the
//! first one's cycle is complete.

use std::sync::Arc;
use std::time::Duration;

use aide_core::text::polish_query;
use aide_core::{
    ActionResult, AssistantStatus, Category, ContextStore, CoreError, DispatchBatch, DispatchId,
    DispatchOutcome, DispatchPhase, IntentClassifier, NoContext, Responder,
};
use futures_util::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::HandlerError;
use crate::registry::ActionRegistry;
use crate::status::{StatusCell, StatusReader};

/// What the responder is asked when the user says goodbye.
pub const FAREWELL_PROMPT: &str = "Okay, Bye!";

/// Farewell used when the responder cannot produce one.
pub const FALLBACK_FAREWELL: &str = "Goodbye! Talk to you soon.";

/// Reply used when the responder fails.
pub const APOLOGY: &str = "Sorry, I couldn't come up with an answer right now. Please try again.";

/// User id used for memory lookups when none is configured.
pub const DEFAULT_USER_ID: &str = "default";

struct PendingAction {
    category: Category,
    argument: String,
    task: JoinHandle<ActionResult>,
}

/// Routes classified instructions to handlers and the responder.
pub struct Dispatcher {
    classifier: Arc<dyn IntentClassifier>,
    responder: Arc<dyn Responder>,
    context: Arc<dyn ContextStore>,
    registry: ActionRegistry,
    status: StatusCell,
    phase: Mutex<DispatchPhase>,
    user_id: String,
    handler_timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher with no memory store and no handler timeout.
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        responder: Arc<dyn Responder>,
        registry: ActionRegistry,
    ) -> Self {
        Self {
            classifier,
            responder,
            context: Arc::new(NoContext),
            registry,
            status: StatusCell::new(),
            phase: Mutex::new(DispatchPhase::Idle),
            user_id: DEFAULT_USER_ID.to_string(),
            handler_timeout: None,
        }
    }

    /// Builder method to set the memory store used for conversational context.
    pub fn with_context_store(mut self, context: Arc<dyn ContextStore>) -> Self {
        self.context = context;
        self
    }

    /// Builder method to set the user whose memories are read and appended.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Builder method to bound each handler's run time. `None` waits forever.
    pub fn with_handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Read-only status accessor for polling UIs.
    pub fn status(&self) -> StatusReader {
        self.status.reader()
    }

    /// Current assistant status.
    pub fn current_status(&self) -> AssistantStatus {
        self.status.reader().get()
    }

    /// Set the status from the host loop (e.g. `Listening` while capturing).
    pub fn set_status(&self, status: AssistantStatus) {
        self.status.set(status);
    }

    /// Process one instruction end to end.
    ///
    /// Only classifier failures are returned as errors. Handler and responder
    /// failures are reported inside the outcome.
    pub async fn dispatch(&self, instruction: &str) -> Result<DispatchOutcome, CoreError> {
        let mut phase = self.phase.lock().await;
        let _busy = self.status.busy_guard();
        let id = DispatchId::generate();

        if *phase != DispatchPhase::Idle {
            let stale = *phase;
            warn!(dispatch_id = %id, phase = ?stale, "Previous dispatch did not finish cleanly, resetting");
            *phase = DispatchPhase::Idle;
        }

        info!(dispatch_id = %id, instruction = %instruction, "Dispatching instruction");
        advance(&mut phase, DispatchPhase::Classifying, &id)?;
        self.status.set(AssistantStatus::Thinking);

        let batch = match self.classify(instruction).await {
            Ok(batch) => batch,
            Err(e) => {
                error!(dispatch_id = %id, error = %e, "Classification failed");
                advance(&mut phase, DispatchPhase::Failed, &id)?;
                advance(&mut phase, DispatchPhase::Idle, &id)?;
                self.status.set(AssistantStatus::Available);
                return Err(e);
            }
        };

        let mut outcome = DispatchOutcome::new(id.clone());
        for item in batch.unrecognized() {
            warn!(dispatch_id = %id, line = %item.argument, "Skipping unrecognized sub-instruction");
            outcome.unrecognized.push(item.argument.clone());
        }
        if batch.suppressed() > 0 {
            info!(dispatch_id = %id, count = batch.suppressed(), "Suppressed open without a target");
        }

        advance(&mut phase, DispatchPhase::Dispatching, &id)?;

        let pending = self.spawn_automations(&batch, &id);

        advance(&mut phase, DispatchPhase::Collecting, &id)?;
        outcome.automations_run = collect(pending).await;

        advance(&mut phase, DispatchPhase::Responding, &id)?;

        // Exit replaces the conversational reply with a farewell.
        if batch.has_exit() {
            info!(dispatch_id = %id, automations = outcome.automations_run.len(), "Exit requested");
            outcome.conversational_reply = Some(self.farewell().await);
            outcome.should_exit = true;
            self.status.set(AssistantStatus::Off);
            advance(&mut phase, DispatchPhase::Idle, &id)?;
            return Ok(outcome);
        }

        if let Some(query) = batch.merged_query() {
            let reply = self.converse(instruction, &query, batch.wants_realtime(), &id).await;
            outcome.conversational_reply = Some(reply);
        }

        self.status.set(AssistantStatus::Available);
        advance(&mut phase, DispatchPhase::Idle, &id)?;

        info!(
            dispatch_id = %id,
            automations = outcome.automations_run.len(),
            all_succeeded = outcome.all_succeeded(),
            replied = outcome.conversational_reply.is_some(),
            "Dispatch complete"
        );
        Ok(outcome)
    }

    async fn classify(&self, instruction: &str) -> Result<DispatchBatch, CoreError> {
        let lines = self.classifier.classify(instruction).await.map_err(|e| match e {
            CoreError::Classification(_) => e,
            other => CoreError::Classification(other.to_string()),
        })?;

        let lines: Vec<&str> = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(CoreError::Classification(
                "classifier returned no sub-instructions".to_string(),
            ));
        }

        debug!(lines = ?lines, "Classifier output");
        Ok(DispatchBatch::from_lines(lines))
    }

    /// Start every automation as its own task.
    fn spawn_automations(&self, batch: &DispatchBatch, id: &DispatchId) -> Vec<PendingAction> {
        batch
            .automations()
            .map(|item| {
                let category = item.category;
                let argument = item.argument.clone();
                let handler = self.registry.get(category);
                let timeout = self.handler_timeout;
                let id = id.clone();

                let task = tokio::spawn(async move {
                    let Some(handler) = handler else {
                        warn!(dispatch_id = %id, category = %category, "No handler registered");
                        return ActionResult::failure(category, argument, "No handler registered");
                    };

                    info!(dispatch_id = %id, category = %category, argument = %argument, "Handler started");
                    let result = match timeout {
                        Some(limit) => tokio::time::timeout(limit, handler.run(&argument))
                            .await
                            .unwrap_or_else(|_| Err(HandlerError::Timeout(limit))),
                        None => handler.run(&argument).await,
                    };

                    match result {
                        Ok(message) => {
                            info!(dispatch_id = %id, category = %category, "Handler succeeded");
                            ActionResult::success(category, argument, message)
                        }
                        Err(e) => {
                            warn!(dispatch_id = %id, category = %category, error = %e, "Handler failed");
                            ActionResult::failure(category, argument, e.to_string())
                        }
                    }
                });

                PendingAction {
                    category,
                    argument: item.argument.clone(),
                    task,
                }
            })
            .collect()
    }

    async fn converse(&self, instruction: &str, query: &str, realtime: bool, id: &DispatchId) -> String {
        self.status.set(if realtime {
            AssistantStatus::Searching
        } else {
            AssistantStatus::Thinking
        });

        let context = match self.context.get_context(&self.user_id).await {
            Ok(context) => context,
            Err(e) => {
                warn!(dispatch_id = %id, error = %e, "Memory context unavailable");
                String::new()
            }
        };

        let polished = polish_query(query);
        debug!(dispatch_id = %id, query = %polished, realtime, "Asking responder");

        let reply = match self.responder.respond(&polished, realtime, &context).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(dispatch_id = %id, error = %e, "Responder failed");
                self.status.set(AssistantStatus::Answering);
                return APOLOGY.to_string();
            }
        };

        self.status.set(AssistantStatus::Answering);
        if let Err(e) = self
            .context
            .record_exchange(&self.user_id, instruction, &reply)
            .await
        {
            warn!(dispatch_id = %id, error = %e, "Could not record exchange");
        }

        reply
    }

    async fn farewell(&self) -> String {
        match self.responder.respond(FAREWELL_PROMPT, false, "").await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => FALLBACK_FAREWELL.to_string(),
            Err(e) => {
                warn!(error = %e, "Farewell generation failed");
                FALLBACK_FAREWELL.to_string()
            }
        }
    }
}

fn advance(phase: &mut DispatchPhase, next: DispatchPhase, id: &DispatchId) -> Result<(), CoreError> {
    let from = *phase;
    *phase = from.transition(next)?;
    debug!(dispatch_id = %id, from = ?from, to = ?next, "Dispatch phase");
    Ok(())
}

/// Wait for every task. A task that panicked becomes a failed result.
async fn collect(pending: Vec<PendingAction>) -> Vec<ActionResult> {
    join_all(pending.into_iter().map(|action| async move {
        match action.task.await {
            Ok(result) => result,
            Err(e) => {
                error!(category = %action.category, error = %e, "Handler task aborted");
                ActionResult::failure(
                    action.category,
                    action.argument,
                    HandlerError::Join(e.to_string()).to_string(),
                )
            }
        }
    }))
    .await
}
