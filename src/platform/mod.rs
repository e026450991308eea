//! Platform abstraction layer
//!
//! Host-side input helpers shared by the browser and native front ends:
//! - Key code to `Command` mapping
//! - Flap debouncing (keyboard repeat, touch + synthetic mouse events)

use crate::sim::Command;

/// Minimum time between two accepted flaps
pub const FLAP_COOLDOWN_MS: f64 = 100.0;

/// Map a `KeyboardEvent.code` to a command
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "Space" | "ArrowUp" | "KeyW" => Some(Command::Flap),
        "KeyP" => Some(Command::Pause),
        "KeyD" => Some(Command::ToggleDebug),
        "KeyM" => Some(Command::ToggleMute),
        "KeyF" => Some(Command::ToggleFps),
        _ => None,
    }
}

/// Drops flaps that arrive within the cooldown of the last accepted one
#[derive(Debug, Clone, Copy)]
pub struct FlapDebounce {
    cooldown_ms: f64,
    last_ms: Option<f64>,
}

impl Default for FlapDebounce {
    fn default() -> Self {
        Self::new(FLAP_COOLDOWN_MS)
    }
}

impl FlapDebounce {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            last_ms: None,
        }
    }

    /// True if a flap at `now_ms` should go through. The cooldown must be
    /// strictly exceeded.
    pub fn accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms - last <= self.cooldown_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }
}
