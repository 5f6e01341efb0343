//! Aide command dispatcher
//!
//! Turns one user instruction into side effects and a reply:
//!
//! 1. the [`IntentClassifier`](aide_core::IntentClassifier) splits it into
//!    tagged lines, parsed into a [`DispatchBatch`](aide_core::DispatchBatch)
//! 2. every automation (`open`, `close`, `play`, `content`, searches,
//!    `system`) runs as its own task through the [`ActionRegistry`]
//! 3. all `general`/`realtime` asks are merged into one query for the
//!    [`Responder`](aide_core::Responder)
//! 4. an `exit` line swaps the reply for a farewell and sets status `Off`
//!    once the automations have finished
//!
//! OS effects go through the traits in [`platform`]; [`SystemPlatform`]
//! implements them with the desktop's command-line helpers.

pub mod dispatcher;
pub mod effects;
pub mod error;
pub mod fuzzy;
pub mod handlers;
pub mod platform;
pub mod registry;
pub mod reminder;
pub mod status;
pub mod web;

pub use dispatcher::{Dispatcher, APOLOGY, FALLBACK_FAREWELL, FAREWELL_PROMPT};
pub use error::{HandlerError, PlatformError};
pub use platform::{Apps, Backlight, Mixer, Opener, Platform, SystemPlatform};
pub use registry::{ActionHandler, ActionRegistry};
pub use reminder::create_reminder;
pub use status::StatusReader;
pub use web::{WebClient, WebLookup};
