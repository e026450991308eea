//! Decaying screen shake

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::ShakeTuning;

/// Render-time camera offset. Only the latest tick's offset is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraShake {
    pub magnitude: f32,
    pub offset: Vec2,
}

impl CameraShake {
    pub fn set(&mut self, magnitude: f32) {
        self.magnitude = magnitude;
    }

    pub fn reset(&mut self) {
        self.magnitude = 0.0;
        self.offset = Vec2::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.magnitude > 0.0
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R, tuning: &ShakeTuning) {
        if self.magnitude > tuning.epsilon {
            self.magnitude *= tuning.decay;
            let half = self.magnitude / 2.0;
            self.offset = Vec2::new(
                (rng.random::<f32>() - 0.5) * self.magnitude,
                (rng.random::<f32>() - 0.5) * self.magnitude,
            )
            .clamp(Vec2::splat(-half), Vec2::splat(half));
        } else {
            self.reset();
        }
    }
}
