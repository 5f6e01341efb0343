//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use aide_dispatch::{Dispatcher, Opener};
use tokio::sync::Notify;

/// Shared application state.
pub struct AppState {
    /// Instruction dispatcher.
    pub dispatcher: Arc<Dispatcher>,

    /// Opener used for reminder files.
    pub opener: Arc<dyn Opener>,

    /// Where reminder files are written.
    pub reminders_dir: PathBuf,

    /// Signalled when an instruction asks the assistant to exit.
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(dispatcher: Arc<Dispatcher>, opener: Arc<dyn Opener>, reminders_dir: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            opener,
            reminders_dir,
            shutdown: Arc::new(Notify::new()),
        })
    }
}
