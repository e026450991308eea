//! Frame driver
//!
//! Turns variable wall-clock frames into fixed simulation ticks, routes
//! commands, forwards simulation events to audio and storage, and rebuilds
//! the draw list once per frame.

use glam::Vec2;
use serde::Serialize;

use crate::audio::AudioSink;
use crate::consts::SIM_DT;
use crate::persistence::Store;
use crate::renderer::{Vertex, scene};
use crate::sim::{Command, GameEvent, GameMode, GameState, apply_command, tick};
use crate::tuning::Tuning;

/// Read-only view of the session for HUDs and hosts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: GameMode,
    pub score: u32,
    pub best_score: u32,
    pub paused: bool,
    pub debug: bool,
    pub muted: bool,
    /// Present only while the FPS display is on
    pub fps: Option<u32>,
    pub bird_pos: Vec2,
    pub bird_velocity: f32,
    pub active_pipes: usize,
}

/// Frames per second measured over windows of at least one second
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    pub enabled: bool,
    frames: u32,
    elapsed: f32,
    fps: u32,
}

impl FpsCounter {
    pub fn record(&mut self, wall_dt: f32) {
        self.frames += 1;
        self.elapsed += wall_dt;
        if self.elapsed >= 1.0 {
            self.fps = (self.frames as f32 / self.elapsed).round() as u32;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// A running game wired to its collaborators
pub struct Game<A: AudioSink, S: Store> {
    state: GameState,
    accumulator: f32,
    audio: A,
    store: S,
    muted: bool,
    fps: FpsCounter,
    draw_list: Vec<Vertex>,
    frames_rendered: u64,
}

impl<A: AudioSink, S: Store> Game<A, S> {
    pub fn new(seed: u64, tuning: Tuning, mut audio: A, mut store: S) -> Self {
        let best_score = store.load_best_score();
        let muted = store.load_muted();
        audio.set_muted(muted);
        log::info!("Game created (seed {seed}, best {best_score}, muted {muted})");

        Self {
            state: GameState::new(seed, tuning, best_score),
            accumulator: 0.0,
            audio,
            store,
            muted,
            fps: FpsCounter::default(),
            draw_list: Vec::new(),
            frames_rendered: 0,
        }
    }

    /// Apply a command immediately, between ticks
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::ToggleMute => {
                self.muted = !self.muted;
                self.audio.set_muted(self.muted);
                self.store.save_muted(self.muted);
            }
            Command::ToggleFps => {
                self.fps.enabled = !self.fps.enabled;
            }
            _ => apply_command(&mut self.state, command),
        }
        self.dispatch_events();
    }

    /// Advance by one display frame of `wall_dt` seconds. Returns the number
    /// of fixed ticks run.
    pub fn advance_frame(&mut self, wall_dt: f32) -> u32 {
        // Negative, NaN or infinite deltas count as no time passing
        let wall_dt = if wall_dt.is_finite() {
            wall_dt.max(0.0)
        } else {
            log::debug!("Ignoring non-finite frame delta {wall_dt}");
            0.0
        };
        self.fps.record(wall_dt);

        let dt = if self.state.debug {
            wall_dt * self.state.tuning.frame.slow_motion
        } else {
            wall_dt
        };
        self.accumulator += dt;

        let max_ticks = self.state.tuning.frame.max_ticks_per_frame;
        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < max_ticks {
            tick(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            ticks += 1;
        }

        // Spiral-of-death guard: drop whole ticks beyond the cap, keep the fraction
        if self.accumulator >= SIM_DT {
            let dropped = (self.accumulator / SIM_DT) as u32;
            self.accumulator %= SIM_DT;
            log::debug!("Frame hit the {max_ticks} tick cap, dropped {dropped} ticks");
        }

        self.dispatch_events();
        self.render();
        ticks
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Flap => self.audio.play_flap(),
                GameEvent::Score => self.audio.play_score(),
                GameEvent::Hit => self.audio.play_hit(),
                GameEvent::NewBest(score) => self.store.save_best_score(score),
            }
        }
    }

    fn render(&mut self) {
        self.draw_list.clear();
        scene::build(&self.state, &mut self.draw_list);
        self.frames_rendered += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.state.mode,
            score: self.state.score,
            best_score: self.state.best_score,
            paused: self.state.paused,
            debug: self.state.debug,
            muted: self.muted,
            fps: self.fps.enabled.then(|| self.fps.fps()),
            bird_pos: self.state.bird.pos,
            bird_velocity: self.state.bird.velocity,
            active_pipes: self.state.pipes.active_count(),
        }
    }

    /// Triangle list for the last rendered frame, in virtual units
    pub fn draw_list(&self) -> &[Vertex] {
        &self.draw_list
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Seconds of simulation time waiting for the next tick
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[derive(Debug, Default)]
    struct CountingAudio {
        flaps: u32,
        scores: u32,
        hits: u32,
        muted: bool,
    }

    impl AudioSink for CountingAudio {
        fn play_flap(&mut self) {
            self.flaps += 1;
        }
        fn play_score(&mut self) {
            self.scores += 1;
        }
        fn play_hit(&mut self) {
            self.hits += 1;
        }
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }

    fn game() -> Game<CountingAudio, MemoryStore> {
        Game::new(42, Tuning::default(), CountingAudio::default(), MemoryStore::default())
    }

    #[test]
    fn test_negative_delta_runs_nothing() {
        let mut g = game();
        assert_eq!(g.advance_frame(-0.5), 0);
        assert_eq!(g.accumulator(), 0.0);
        assert_eq!(g.frames_rendered(), 1);
    }

    #[test]
    fn test_non_finite_delta_runs_nothing() {
        let mut g = game();
        g.handle(Command::Flap);
        for dt in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            assert_eq!(g.advance_frame(dt), 0);
            assert_eq!(g.accumulator(), 0.0);
        }
        // The loop keeps running normally afterwards
        let ticks: u32 = (0..60).map(|_| g.advance_frame(SIM_DT)).sum();
        assert_eq!(ticks, 60);
        assert_eq!(g.frames_rendered(), 63);
    }

    #[test]
    fn test_one_tick_per_sim_dt_frame() {
        let mut g = game();
        for _ in 0..10 {
            assert_eq!(g.advance_frame(SIM_DT), 1);
        }
        assert_eq!(g.state().time_ticks, 10);
    }

    #[test]
    fn test_small_frames_accumulate() {
        let mut g = game();
        assert_eq!(g.advance_frame(SIM_DT * 0.5), 0);
        assert_eq!(g.advance_frame(SIM_DT * 0.5), 1);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut g = game();
        assert_eq!(g.advance_frame(10.0), 30);
        assert!(g.accumulator() < SIM_DT);
        assert_eq!(g.frames_rendered(), 1);
        assert!(!g.draw_list().is_empty());
    }

    #[test]
    fn test_debug_slows_time() {
        let mut g = game();
        g.handle(Command::ToggleDebug);
        assert_eq!(g.advance_frame(SIM_DT), 0);
        assert_eq!(g.advance_frame(SIM_DT * 4.0), 1);
    }

    #[test]
    fn test_flap_plays_sound_without_a_tick() {
        let mut g = game();
        g.handle(Command::Flap);
        assert_eq!(g.snapshot().mode, GameMode::Playing);
        assert_eq!(g.audio().flaps, 0);

        g.handle(Command::Flap);
        assert_eq!(g.audio().flaps, 1);
        assert_eq!(g.snapshot().bird_velocity, -420.0);
        assert_eq!(g.state().time_ticks, 0);
    }

    #[test]
    fn test_crash_plays_hit_and_saves_best() {
        let mut g = game();
        g.handle(Command::Flap);
        g.state_mut().score = 3;
        for _ in 0..120 {
            g.advance_frame(SIM_DT);
        }
        let snap = g.snapshot();
        assert_eq!(snap.mode, GameMode::GameOver);
        assert_eq!(snap.best_score, 3);
        assert_eq!(g.audio().hits, 1);
        assert_eq!(g.store().data.best_score, 3);
    }

    #[test]
    fn test_mute_persists_through_store() {
        let mut g = game();
        g.handle(Command::ToggleMute);
        assert!(g.audio().muted);
        assert!(g.snapshot().muted);
        assert!(g.store().data.muted);

        let store = g.store().clone();
        let g2 = Game::new(1, Tuning::default(), CountingAudio::default(), store);
        assert!(g2.audio().muted);
        assert!(g2.snapshot().muted);
    }

    #[test]
    fn test_best_score_loaded_from_store() {
        let g = Game::new(
            1,
            Tuning::default(),
            CountingAudio::default(),
            MemoryStore::with_best_score(17),
        );
        assert_eq!(g.snapshot().best_score, 17);
    }

    #[test]
    fn test_fps_only_when_enabled() {
        let mut g = game();
        for _ in 0..120 {
            g.advance_frame(SIM_DT);
        }
        assert_eq!(g.snapshot().fps, None);
        g.handle(Command::ToggleFps);
        assert_eq!(g.snapshot().fps, Some(60));
    }

    #[test]
    fn test_snapshot_serializes() {
        let g = game();
        let json = serde_json::to_string(&g.snapshot()).unwrap();
        assert!(json.contains("\"mode\":\"Title\""));
        assert!(json.contains("\"fps\":null"));
    }

    proptest! {
        #[test]
        fn prop_tick_count_independent_of_chunking(
            chunks in proptest::collection::vec(0.0f32..0.02, 1..20),
        ) {
            let mut chunked = game();
            let chunked_ticks: u32 = chunks.iter().map(|&dt| chunked.advance_frame(dt)).sum();

            let mut whole = game();
            let whole_ticks = whole.advance_frame(chunks.iter().sum());

            prop_assert!(chunked_ticks.abs_diff(whole_ticks) <= 1);
        }
    }
}
