//! `system`: volume, brightness and microphone control.

use std::sync::Arc;

use aide_core::SystemCommand;
use async_trait::async_trait;

use crate::effects;
use crate::error::HandlerError;
use crate::platform::{Backlight, Mixer};
use crate::registry::ActionHandler;

pub struct SystemHandler {
    mixer: Arc<dyn Mixer>,
    backlight: Arc<dyn Backlight>,
}

impl SystemHandler {
    pub fn new(mixer: Arc<dyn Mixer>, backlight: Arc<dyn Backlight>) -> Self {
        Self { mixer, backlight }
    }
}

#[async_trait]
impl ActionHandler for SystemHandler {
    async fn run(&self, argument: &str) -> Result<String, HandlerError> {
        let command = SystemCommand::parse(argument)
            .ok_or_else(|| HandlerError::UnknownCommand(argument.to_string()))?;
        effects::apply(command, self.mixer.as_ref(), self.backlight.as_ref()).await
    }
}
