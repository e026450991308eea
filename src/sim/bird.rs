//! The player's bird: a falling circle with a tilt and a three-frame wing cycle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::tuning::BirdTuning;

/// Tilt limits in degrees (nose up / nose down)
pub const MIN_ROTATION: f32 = -30.0;
pub const MAX_ROTATION: f32 = 90.0;

/// Wing animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WingFrame {
    #[default]
    Up,
    Mid,
    Down,
}

impl WingFrame {
    pub fn next(self) -> Self {
        match self {
            WingFrame::Up => WingFrame::Mid,
            WingFrame::Mid => WingFrame::Down,
            WingFrame::Down => WingFrame::Up,
        }
    }

    /// Vertical wing offset used by the renderer
    pub fn offset(self) -> f32 {
        match self {
            WingFrame::Up => -3.0,
            WingFrame::Mid => 0.0,
            WingFrame::Down => 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    /// Vertical velocity (positive = falling)
    pub velocity: f32,
    pub radius: f32,
    /// Tilt in degrees, eased toward a velocity-derived target
    pub rotation: f32,
    pub wing: WingFrame,
    pub wing_timer: f32,
}

impl Bird {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            velocity: 0.0,
            radius,
            rotation: 0.0,
            wing: WingFrame::Up,
            wing_timer: 0.0,
        }
    }

    /// Back to the spawn pose
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.velocity = 0.0;
        self.rotation = 0.0;
        self.wing = WingFrame::Up;
        self.wing_timer = 0.0;
    }

    /// Replace the current velocity with the flap impulse
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = impulse;
        self.wing = WingFrame::Up;
        self.wing_timer = 0.0;
    }

    pub fn update(&mut self, dt: f32, tuning: &BirdTuning) {
        self.velocity = (self.velocity + tuning.gravity * dt).min(tuning.terminal_velocity);
        self.pos.y += self.velocity * dt;

        let target = (self.velocity * tuning.tilt_per_velocity).clamp(MIN_ROTATION, MAX_ROTATION);
        self.rotation += (target - self.rotation) * tuning.tilt_rate * dt;

        self.wing_timer += dt;
        if self.wing_timer >= tuning.wing_frame_time {
            self.wing = self.wing.next();
            self.wing_timer = 0.0;
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::spawn_point;
    use proptest::prelude::*;

    fn bird() -> Bird {
        Bird::new(spawn_point(), BirdTuning::default().radius)
    }

    #[test]
    fn test_flap_sets_impulse_without_moving() {
        let mut b = bird();
        b.flap(BirdTuning::default().flap_impulse);
        assert_eq!(b.velocity, -420.0);
        assert_eq!(b.pos, spawn_point());
        assert!((b.pos.x - 57.6).abs() < 1e-4);
    }

    #[test]
    fn test_reflap_overrides_velocity() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.flap(tuning.flap_impulse);
        for _ in 0..5 {
            b.update(SIM_DT, &tuning);
        }
        assert!(b.velocity > tuning.flap_impulse);
        b.flap(tuning.flap_impulse);
        assert_eq!(b.velocity, tuning.flap_impulse);
    }

    #[test]
    fn test_gravity_integrates_position() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.update(SIM_DT, &tuning);
        assert!((b.velocity - 30.0).abs() < 1e-4);
        assert!((b.pos.y - (256.0 + 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_eases_instead_of_snapping() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.velocity = tuning.terminal_velocity;
        b.update(SIM_DT, &tuning);
        // Target is 27 degrees, one tick covers 5% of the distance
        assert!(b.rotation > 0.0 && b.rotation < 2.0);
    }

    #[test]
    fn test_wing_cycles_every_frame_time() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        let mut seen = vec![b.wing];
        for _ in 0..60 {
            b.update(SIM_DT, &tuning);
            if *seen.last().unwrap() != b.wing {
                seen.push(b.wing);
            }
            b.pos.y = 256.0;
        }
        assert_eq!(&seen[..4], &[WingFrame::Up, WingFrame::Mid, WingFrame::Down, WingFrame::Up]);
    }

    proptest! {
        #[test]
        fn prop_velocity_never_exceeds_terminal(
            start in -2000.0f32..2000.0,
            ticks in 1usize..600,
        ) {
            let tuning = BirdTuning::default();
            let mut b = bird();
            b.velocity = start;
            for _ in 0..ticks {
                b.update(SIM_DT, &tuning);
                prop_assert!(b.velocity <= tuning.terminal_velocity);
            }
        }

        #[test]
        fn prop_rotation_stays_in_range(
            flaps in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let tuning = BirdTuning::default();
            let mut b = bird();
            for flap in flaps {
                if flap {
                    b.flap(tuning.flap_impulse);
                }
                b.update(SIM_DT, &tuning);
                prop_assert!(b.rotation >= MIN_ROTATION && b.rotation <= MAX_ROTATION);
            }
        }
    }
}
