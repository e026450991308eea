//! Game state and session types
//!
//! One owned aggregate per game. Everything the tick reads or writes lives
//! here, including the seeded RNG, so a seed plus a command sequence fully
//! determines a run.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::particles::{ParticleColor, ParticleSystem};
use super::pipe::PipePool;
use super::shake::CameraShake;
use crate::spawn_point;
use crate::tuning::Tuning;

/// Top-level mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Waiting for the first flap
    #[default]
    Title,
    /// Run in progress (may be paused)
    Playing,
    /// Run ended, next flap restarts
    GameOver,
}

/// Side effects requested by the simulation, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Flap,
    Score,
    Hit,
    /// Best score beaten; carries the new best for persistence
    NewBest(u32),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub mode: GameMode,
    /// Freeze flag, only meaningful while `Playing`
    pub paused: bool,
    /// Collision overlays and slow motion
    pub debug: bool,
    pub score: u32,
    pub best_score: u32,
    /// Seconds since the last pipe spawn
    pub spawn_timer: f32,
    pub bird: Bird,
    pub pipes: PipePool,
    pub particles: ParticleSystem,
    pub shake: CameraShake,
    /// Ground scroll in `[0, ground_period)`
    pub ground_offset: f32,
    /// Cloud scroll in `[0, background_period)`
    pub bg_offset: f32,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, best_score: u32) -> Self {
        Self {
            seed,
            mode: GameMode::Title,
            paused: false,
            debug: false,
            score: 0,
            best_score,
            spawn_timer: 0.0,
            bird: Bird::new(spawn_point(), tuning.bird.radius),
            pipes: PipePool::new(tuning.pipes.width),
            particles: ParticleSystem::new(&tuning.particles),
            shake: CameraShake::default(),
            ground_offset: 0.0,
            bg_offset: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Reset the run and enter `Playing`. Used for both the first start and restarts.
    pub fn start_run(&mut self) {
        self.mode = GameMode::Playing;
        self.paused = false;
        self.score = 0;
        self.spawn_timer = 0.0;
        self.bird.reset(spawn_point());
        self.pipes.clear();
        self.particles.clear();
        self.shake.reset();
        log::info!("Run started (seed {}, best {})", self.seed, self.best_score);
    }

    /// End the run: crash feedback, and a new best when beaten
    pub fn game_over(&mut self) {
        self.mode = GameMode::GameOver;
        self.paused = false;
        self.events.push(GameEvent::Hit);
        self.shake.set(self.tuning.shake.death_magnitude);

        let count = self.tuning.particles.death_explosion;
        self.particles
            .explosion(self.bird.pos, ParticleColor::Death, count, &mut self.rng);

        log::info!("Game over with score {}", self.score);
        if self.score > self.best_score {
            self.best_score = self.score;
            self.events.push(GameEvent::NewBest(self.best_score));
            log::info!("New best score: {}", self.best_score);
        }
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.mode == GameMode::Playing && !self.paused
    }
}
