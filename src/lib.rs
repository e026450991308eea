//! Flappy Arcade - a one-button gap-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, particles, collisions)
//! - `game`: Fixed-timestep frame driver wiring the sim to its collaborators
//! - `renderer`: Draw list generation and the WebGPU presenter
//! - `audio`: Sound trigger surface (Web Audio on the browser)
//! - `persistence`: Best score and mute flag storage
//! - `platform`: Key mapping and input debouncing for hosts
//! - `autopilot`: Idle/demo bot used by the headless runner
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod autopilot;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Virtual playfield, independent of the display resolution
    pub const VIRTUAL_WIDTH: f32 = 288.0;
    pub const VIRTUAL_HEIGHT: f32 = 512.0;
    /// Height of the ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 60.0;
    /// Y coordinate of the top of the ground
    pub const FLOOR_Y: f32 = VIRTUAL_HEIGHT - GROUND_HEIGHT;

    /// Bird spawn point (20% across, vertically centered)
    pub const SPAWN_X: f32 = VIRTUAL_WIDTH * 0.2;
    pub const SPAWN_Y: f32 = VIRTUAL_HEIGHT * 0.5;
}

/// Bird spawn point as a vector
#[inline]
pub fn spawn_point() -> Vec2 {
    Vec2::new(consts::SPAWN_X, consts::SPAWN_Y)
}

/// Wrap a scroll offset into `[0, period)`. Reaching the period snaps back
/// to 0 and drops the overshoot, so a tile seam always restarts aligned.
#[inline]
pub fn wrap_offset(offset: f32, period: f32) -> f32 {
    if period <= 0.0 || offset >= period {
        return 0.0;
    }
    offset.max(0.0)
}
