//! Idle/demo mode: a simple bot that steers the bird through the next gap
//!
//! Used by the native headless runner and the browser demo toggle. It only
//! reads the state; the caller turns a `true` into a `Command::Flap`.

use crate::consts::FLOOR_Y;
use crate::sim::{GameMode, GameState, Pipe};

/// Seconds of motion to extrapolate before deciding
const LOOKAHEAD: f32 = 0.05;
/// Aim this fraction of the gap height below its center, a flap peaks near the center
const TARGET_BIAS: f32 = 0.2;

/// First pipe the bird has not fully cleared yet
pub fn next_pipe(state: &GameState) -> Option<&Pipe> {
    let bird = &state.bird;
    state
        .pipes
        .iter_active()
        .filter(|p| p.trailing_edge() + bird.radius > bird.pos.x)
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
}

/// Height the bot tries to hover around
pub fn target_y(state: &GameState) -> f32 {
    match next_pipe(state) {
        Some(pipe) => pipe.gap_center + pipe.gap_height * TARGET_BIAS,
        None => FLOOR_Y * 0.5,
    }
}

/// Whether to flap this frame. Never flaps outside a running, unpaused game.
pub fn should_flap(state: &GameState) -> bool {
    if state.mode != GameMode::Playing || state.paused {
        return false;
    }

    let bird = &state.bird;
    // Wait for the apex before flapping again
    if bird.velocity < 0.0 {
        return false;
    }

    let predicted = bird.pos.y + bird.velocity * LOOKAHEAD;
    let about_to_land = predicted + bird.radius >= FLOOR_Y - 4.0;
    predicted > target_y(state) || about_to_land
}
