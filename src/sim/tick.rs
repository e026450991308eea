//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically, plus the
//! command handling that runs between ticks.

use rand::Rng;

use super::collision::circle_vs_obstacle;
use super::particles::ParticleColor;
use super::state::{GameEvent, GameMode, GameState};
use crate::consts::{FLOOR_Y, VIRTUAL_WIDTH};
use crate::tuning::PipeTuning;
use crate::wrap_offset;

/// Discrete player/host intents, consumed synchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Flap,
    Pause,
    ToggleDebug,
    /// Host-level: handled by the frame driver, ignored by the sim
    ToggleMute,
    /// Host-level: handled by the frame driver, ignored by the sim
    ToggleFps,
}

/// Apply a command to the session
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Flap => match state.mode {
            GameMode::Title | GameMode::GameOver => state.start_run(),
            GameMode::Playing if !state.paused => {
                state.bird.flap(state.tuning.bird.flap_impulse);
                state.events.push(GameEvent::Flap);
                let count = state.tuning.particles.flap_burst;
                state
                    .particles
                    .burst(state.bird.pos, ParticleColor::Flap, count, &mut state.rng);
            }
            GameMode::Playing => {}
        },
        Command::Pause => {
            if state.mode == GameMode::Playing {
                state.paused = !state.paused;
                log::debug!("Paused: {}", state.paused);
            }
        }
        Command::ToggleDebug => {
            state.debug = !state.debug;
            log::debug!("Debug overlays: {}", state.debug);
        }
        Command::ToggleMute | Command::ToggleFps => {}
    }
}

/// Gap height for the current score: shrinks one unit per point, floored at `min_gap`
pub fn gap_height_for_score(score: u32, tuning: &PipeTuning) -> f32 {
    let reduction = score.min(tuning.gap_reduction_cap) as f32;
    (tuning.base_gap - reduction).max(tuning.min_gap)
}

/// Spawn a pipe just past the right edge with a randomly placed gap
pub fn spawn_pipe(state: &mut GameState) -> usize {
    let tuning = &state.tuning.pipes;
    let gap = gap_height_for_score(state.score, tuning);
    let top_min = tuning.gap_margin;
    let top_max = (FLOOR_Y - gap - tuning.gap_margin).max(top_min);
    let gap_top = top_min + state.rng.random::<f32>() * (top_max - top_min);
    let x = VIRTUAL_WIDTH + tuning.spawn_offset;

    let slot = state.pipes.acquire();
    if let Some(pipe) = state.pipes.get_mut(slot) {
        pipe.setup(x, gap_top + gap / 2.0, gap);
    }
    slot
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    // Pause freezes the whole world, effects included
    if state.mode == GameMode::Playing && state.paused {
        return;
    }

    if state.mode == GameMode::Playing {
        step_playing(state, dt);
    }

    state.shake.update(&mut state.rng, &state.tuning.shake);
    state.particles.update(dt);
    state.time_ticks += 1;
}

fn step_playing(state: &mut GameState, dt: f32) {
    state.bird.update(dt, &state.tuning.bird);
    if state.bird.bottom() >= FLOOR_Y || state.bird.top() <= 0.0 {
        state.game_over();
        return;
    }

    state.spawn_timer += dt;
    if state.spawn_timer >= state.tuning.pipes.spawn_interval {
        spawn_pipe(state);
        state.spawn_timer = 0.0;
    }

    let speed = state.tuning.pipes.speed;
    let circle = state.bird.circle();
    for i in 0..state.pipes.active_count() {
        let slot = state.pipes.active_slots()[i];
        let Some(pipe) = state.pipes.get_mut(slot) else {
            continue;
        };
        pipe.update(dt, speed);

        if circle_vs_obstacle(&circle, pipe) {
            state.game_over();
            return;
        }

        if !pipe.scored && pipe.trailing_edge() < circle.center.x {
            pipe.scored = true;
            state.score += 1;
            state.events.push(GameEvent::Score);
            let count = state.tuning.particles.score_burst;
            state
                .particles
                .burst(state.bird.pos, ParticleColor::Score, count, &mut state.rng);
        }
    }

    let cull_x = state.tuning.pipes.cull_x;
    let mut i = 0;
    while i < state.pipes.active_count() {
        let slot = state.pipes.active_slots()[i];
        match state.pipes.get(slot) {
            Some(pipe) if pipe.trailing_edge() < cull_x => state.pipes.release(slot),
            _ => i += 1,
        }
    }

    let scroll = &state.tuning.scroll;
    state.ground_offset = wrap_offset(
        state.ground_offset + scroll.ground_speed * dt,
        scroll.ground_period,
    );
    state.bg_offset = wrap_offset(
        state.bg_offset + scroll.background_speed * dt,
        scroll.background_period,
    );
}
