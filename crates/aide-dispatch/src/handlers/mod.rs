//! Per-category automation handlers.

mod close;
mod content;
mod open;
mod play;
mod search;
mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use close::CloseHandler;
pub use content::ContentHandler;
pub use open::OpenHandler;
pub use play::PlayHandler;
pub use search::{SearchEngine, SearchHandler};
pub use system::SystemHandler;
