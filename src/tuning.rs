//! Data-driven game balance
//!
//! Every knob the simulation reads lives here. All fields have defaults, so a
//! tuning file only needs to list the values it overrides.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{FLOOR_Y, SIM_DT};

/// Bird physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub flap_impulse: f32,
    /// Maximum falling speed
    pub terminal_velocity: f32,
    /// Collision radius
    pub radius: f32,
    /// Degrees of tilt per unit of velocity
    pub tilt_per_velocity: f32,
    /// Exponential easing rate toward the target tilt (1/s)
    pub tilt_rate: f32,
    /// Seconds per wing frame
    pub wing_frame_time: f32,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            flap_impulse: -420.0,
            terminal_velocity: 900.0,
            radius: 12.0,
            tilt_per_velocity: 0.03,
            tilt_rate: 3.0,
            wing_frame_time: 0.2,
        }
    }
}

/// Pipe spawning, motion and difficulty curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeTuning {
    pub width: f32,
    /// Horizontal scroll speed (units/s)
    pub speed: f32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Distance past the right edge where pipes appear
    pub spawn_offset: f32,
    /// Pipes are released once their trailing edge passes this x
    pub cull_x: f32,
    /// Gap height at score 0
    pub base_gap: f32,
    /// Gap height never shrinks below this
    pub min_gap: f32,
    /// Score beyond which the gap stops shrinking
    pub gap_reduction_cap: u32,
    /// Minimum distance between the gap and the ceiling / floor
    pub gap_margin: f32,
}

impl Default for PipeTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            speed: 120.0,
            spawn_interval: 1.25,
            spawn_offset: 50.0,
            cull_x: -50.0,
            base_gap: 160.0,
            min_gap: 120.0,
            gap_reduction_cap: 40,
            gap_margin: 80.0,
        }
    }
}

/// Particle pool and emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Hard cap on pooled particles
    pub capacity: usize,
    pub gravity: f32,
    /// Per-tick horizontal velocity multiplier
    pub drag: f32,
    pub flap_burst: usize,
    pub score_burst: usize,
    pub death_explosion: usize,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            capacity: 100,
            gravity: 400.0,
            drag: 0.98,
            flap_burst: 8,
            score_burst: 12,
            death_explosion: 20,
        }
    }
}

/// Camera shake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeTuning {
    /// Per-tick magnitude multiplier
    pub decay: f32,
    /// Below this the magnitude snaps to zero
    pub epsilon: f32,
    /// Magnitude applied on game over
    pub death_magnitude: f32,
}

impl Default for ShakeTuning {
    fn default() -> Self {
        Self {
            decay: 0.9,
            epsilon: 0.1,
            death_magnitude: 15.0,
        }
    }
}

/// Background and ground scrolling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollTuning {
    pub ground_speed: f32,
    pub ground_period: f32,
    pub background_speed: f32,
    pub background_period: f32,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            ground_speed: 180.0,
            ground_period: 64.0,
            background_speed: 30.0,
            background_period: 100.0,
        }
    }
}

/// Frame driver behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTuning {
    /// Wall-clock multiplier while debug mode is on
    pub slow_motion: f32,
    /// Upper bound on fixed ticks run by a single frame
    pub max_ticks_per_frame: u32,
}

impl Default for FrameTuning {
    fn default() -> Self {
        Self {
            slow_motion: 0.25,
            max_ticks_per_frame: 30,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub bird: BirdTuning,
    pub pipes: PipeTuning,
    pub particles: ParticleTuning,
    pub shake: ShakeTuning,
    pub scroll: ScrollTuning,
    pub frame: FrameTuning,
}

/// Why a tuning file was rejected
#[derive(Debug)]
pub enum TuningError {
    /// JSON could not be parsed into a `Tuning`
    Parse(serde_json::Error),
    /// A value is outside its allowed range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning parse error: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a template file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let bird = &self.bird;
        if bird.gravity < 0.0 {
            return Err(invalid("bird.gravity", "must be non-negative"));
        }
        if bird.terminal_velocity <= 0.0 {
            return Err(invalid("bird.terminal_velocity", "must be positive"));
        }
        if bird.radius <= 0.0 {
            return Err(invalid("bird.radius", "must be positive"));
        }
        // Easing must not overshoot within a single tick
        if bird.tilt_rate < 0.0 || bird.tilt_rate * SIM_DT > 1.0 {
            return Err(invalid("bird.tilt_rate", "must be in [0, 1/SIM_DT]"));
        }
        if bird.wing_frame_time <= 0.0 {
            return Err(invalid("bird.wing_frame_time", "must be positive"));
        }

        let pipes = &self.pipes;
        if pipes.width <= 0.0 {
            return Err(invalid("pipes.width", "must be positive"));
        }
        if pipes.spawn_interval <= 0.0 {
            return Err(invalid("pipes.spawn_interval", "must be positive"));
        }
        if pipes.min_gap <= 0.0 {
            return Err(invalid("pipes.min_gap", "must be positive"));
        }
        if pipes.min_gap > pipes.base_gap {
            return Err(invalid("pipes.min_gap", "must not exceed pipes.base_gap"));
        }
        if pipes.base_gap + 2.0 * pipes.gap_margin > FLOOR_Y {
            return Err(invalid("pipes.base_gap", "gap plus margins must fit above the ground"));
        }

        if self.particles.capacity == 0 {
            return Err(invalid("particles.capacity", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.particles.drag) {
            return Err(invalid("particles.drag", "must be in [0, 1]"));
        }

        if !(0.0..1.0).contains(&self.shake.decay) {
            return Err(invalid("shake.decay", "must be in [0, 1)"));
        }
        if self.shake.epsilon <= 0.0 {
            return Err(invalid("shake.epsilon", "must be positive"));
        }

        if self.scroll.ground_period <= 0.0 || self.scroll.background_period <= 0.0 {
            return Err(invalid("scroll", "periods must be positive"));
        }

        if self.frame.slow_motion <= 0.0 {
            return Err(invalid("frame.slow_motion", "must be positive"));
        }
        if self.frame.max_ticks_per_frame == 0 {
            return Err(invalid("frame.max_ticks_per_frame", "must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "pipes": { "speed": 150.0 } }"#).unwrap();
        assert_eq!(tuning.pipes.speed, 150.0);
        assert_eq!(tuning.pipes.base_gap, 160.0);
        assert_eq!(tuning.bird, BirdTuning::default());
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }

    #[test]
    fn test_rejects_min_gap_above_base() {
        let err = Tuning::from_json(r#"{ "pipes": { "min_gap": 200.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "pipes.min_gap", .. }));
    }

    #[test]
    fn test_rejects_zero_particle_capacity() {
        let mut tuning = Tuning::default();
        tuning.particles.capacity = 0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning parse error"));
    }
}
