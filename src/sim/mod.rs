//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (owned by `GameState`)
//! - Stable iteration order (pipes and particles in spawn order)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod particles;
pub mod pipe;
pub mod shake;
pub mod state;
pub mod tick;

pub use bird::{Bird, WingFrame};
pub use collision::{
    Aabb, Circle, Collidable, Collider, box_vs_box, circle_vs_box, circle_vs_circle,
    circle_vs_collidable, circle_vs_collider, circle_vs_obstacle, collision_normal, point_in_box,
};
pub use particles::{Particle, ParticleColor, ParticleSystem};
pub use pipe::{Pipe, PipePool};
pub use shake::CameraShake;
pub use state::{GameEvent, GameMode, GameState};
pub use tick::{Command, apply_command, gap_height_for_score, spawn_pipe, tick};
