//! System-effect primitives behind `system` instructions.

use aide_core::SystemCommand;
use tracing::info;

use crate::error::HandlerError;
use crate::platform::{Backlight, Mixer};

/// Apply a percent delta to a `[0, 1]` volume scalar, clamped to range.
pub fn apply_volume_delta(current: f32, delta_percent: i32) -> f32 {
    (current + delta_percent as f32 / 100.0).clamp(0.0, 1.0)
}

/// Apply a percent delta to a `[0, 100]` brightness, clamped to range.
pub fn apply_brightness_delta(current: u8, delta_percent: i32) -> u8 {
    i32::from(current).saturating_add(delta_percent).clamp(0, 100) as u8
}

/// Read, adjust and write back the master volume. Returns the new level.
pub async fn adjust_volume(mixer: &dyn Mixer, delta_percent: i32) -> Result<f32, HandlerError> {
    let current = mixer.volume().await?;
    let next = apply_volume_delta(current, delta_percent);
    mixer.set_volume(next).await?;
    info!(from = current, to = next, delta = delta_percent, "Volume adjusted");
    Ok(next)
}

/// Read, adjust and write back the display brightness. Returns the new level.
pub async fn adjust_brightness(backlight: &dyn Backlight, delta_percent: i32) -> Result<u8, HandlerError> {
    let current = backlight.brightness().await?;
    let next = apply_brightness_delta(current, delta_percent);
    backlight.set_brightness(next).await?;
    info!(from = current, to = next, delta = delta_percent, "Brightness adjusted");
    Ok(next)
}

/// Toggle the default microphone's mute state.
pub async fn toggle_mic(mixer: &dyn Mixer) -> Result<(), HandlerError> {
    mixer.toggle_mic().await?;
    info!("Microphone mute toggled");
    Ok(())
}

/// Run one parsed system command and describe what changed.
pub async fn apply(
    command: SystemCommand,
    mixer: &dyn Mixer,
    backlight: &dyn Backlight,
) -> Result<String, HandlerError> {
    match command {
        SystemCommand::Volume { delta } => {
            let level = adjust_volume(mixer, delta).await?;
            Ok(format!("Volume set to {}%", (level * 100.0).round() as u32))
        }
        SystemCommand::Brightness { delta } => {
            let level = adjust_brightness(backlight, delta).await?;
            Ok(format!("Brightness set to {}%", level))
        }
        SystemCommand::ToggleMic => {
            toggle_mic(mixer).await?;
            Ok("Microphone toggled".to_string())
        }
    }
}
