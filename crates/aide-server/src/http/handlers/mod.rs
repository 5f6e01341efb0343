//! HTTP request handlers.

mod dispatch;
mod health;
mod reminders;
mod status;

#[cfg(test)]
mod test_support;

pub use dispatch::dispatch;
pub use health::health_check;
pub use reminders::create_reminder;
pub use status::{status_json, status_text};
