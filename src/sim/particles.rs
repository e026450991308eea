//! Pooled transient particles for flap, score and crash feedback
//!
//! Purely visual: nothing here feeds back into gameplay.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::ParticleTuning;

/// Color tag, resolved to RGBA by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Gold flap puff
    #[default]
    Flap,
    /// Green score sparkle
    Score,
    /// Red crash debris
    Death,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    /// Lifetime at spawn
    pub max_life: f32,
    pub size: f32,
    pub color: ParticleColor,
    pub active: bool,
}

impl Particle {
    fn setup(&mut self, pos: Vec2, vel: Vec2, life: f32, size: f32, color: ParticleColor) {
        self.pos = pos;
        self.vel = vel;
        self.life = life;
        self.max_life = life;
        self.size = size;
        self.color = color;
        self.active = true;
    }

    fn update(&mut self, dt: f32, gravity: f32, drag: f32) {
        self.pos += self.vel * dt;
        self.vel.y += gravity * dt;
        self.vel.x *= drag;
        self.life -= dt;
        if self.life <= 0.0 {
            self.active = false;
        }
    }

    /// Remaining life fraction in `[0, 1]`, drives alpha and size
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Bounded particle pool
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    free: Vec<usize>,
    /// Active slots, oldest first
    active: VecDeque<usize>,
    capacity: usize,
    gravity: f32,
    drag: f32,
}

impl ParticleSystem {
    pub fn new(tuning: &ParticleTuning) -> Self {
        Self {
            particles: Vec::with_capacity(tuning.capacity),
            free: Vec::new(),
            active: VecDeque::with_capacity(tuning.capacity),
            capacity: tuning.capacity.max(1),
            gravity: tuning.gravity,
            drag: tuning.drag,
        }
    }

    /// Slot for a new particle. At capacity the oldest active particle is
    /// reclaimed and moves to the back of the active list.
    fn spawn(&mut self) -> usize {
        let slot = if let Some(slot) = self.free.pop() {
            slot
        } else if self.particles.len() < self.capacity {
            self.particles.push(Particle::default());
            self.particles.len() - 1
        } else {
            match self.active.pop_front() {
                Some(oldest) => oldest,
                // Full pool with nothing active cannot happen: every slot is free or active
                None => return self.particles.len() - 1,
            }
        };
        self.active.push_back(slot);
        slot
    }

    fn emit(&mut self, pos: Vec2, vel: Vec2, life: f32, size: f32, color: ParticleColor) {
        let slot = self.spawn();
        self.particles[slot].setup(pos, vel, life, size, color);
    }

    /// Ring of `count` particles evenly spaced in angle, kicked slightly upward
    pub fn burst<R: Rng>(&mut self, pos: Vec2, color: ParticleColor, count: usize, rng: &mut R) {
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let speed = 50.0 + rng.random::<f32>() * 100.0;
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 50.0);
            let life = 0.3 + rng.random::<f32>() * 0.4;
            let size = 2.0 + rng.random::<f32>() * 3.0;
            self.emit(pos, vel, life, size, color);
        }
    }

    /// Larger burst with fully random directions
    pub fn explosion<R: Rng>(&mut self, pos: Vec2, color: ParticleColor, count: usize, rng: &mut R) {
        for _ in 0..count {
            let angle = rng.random::<f32>() * TAU;
            let speed = 80.0 + rng.random::<f32>() * 120.0;
            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            let life = 0.5 + rng.random::<f32>() * 0.8;
            let size = 3.0 + rng.random::<f32>() * 4.0;
            self.emit(pos, vel, life, size, color);
        }
    }

    pub fn update(&mut self, dt: f32) {
        let Self {
            particles,
            free,
            active,
            gravity,
            drag,
            ..
        } = self;

        active.retain(|&slot| {
            let particle = &mut particles[slot];
            particle.update(dt, *gravity, *drag);
            if particle.active {
                true
            } else {
                free.push(slot);
                false
            }
        });
    }

    pub fn clear(&mut self) {
        for slot in self.active.drain(..) {
            self.particles[slot].active = false;
            self.free.push(slot);
        }
    }

    /// Active particles, oldest first
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.active.iter().map(move |&slot| &self.particles[slot])
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of particles ever allocated (never exceeds capacity)
    pub fn pool_size(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn system(capacity: usize) -> ParticleSystem {
        ParticleSystem::new(&ParticleTuning {
            capacity,
            ..Default::default()
        })
    }

    #[test]
    fn test_burst_ring_is_evenly_spaced() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = system(100);
        ps.burst(Vec2::ZERO, ParticleColor::Flap, 4, &mut rng);
        assert_eq!(ps.active_count(), 4);

        // First particle points along +x; the -50 upward kick only touches vy
        let first = ps.iter_active().next().unwrap();
        assert!(first.vel.x > 0.0);
        assert!((first.vel.y + 50.0).abs() < 1e-3);
        for p in ps.iter_active() {
            assert!(p.life >= 0.3 && p.life <= 0.7);
            assert!(p.size >= 2.0 && p.size <= 5.0);
            assert_eq!(p.color, ParticleColor::Flap);
        }
    }

    #[test]
    fn test_particles_expire_and_return_to_pool() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ps = system(100);
        ps.explosion(Vec2::new(100.0, 100.0), ParticleColor::Death, 20, &mut rng);
        assert_eq!(ps.active_count(), 20);

        // Longest explosion life is 1.3 s
        for _ in 0..90 {
            ps.update(SIM_DT);
        }
        assert_eq!(ps.active_count(), 0);

        ps.burst(Vec2::ZERO, ParticleColor::Score, 12, &mut rng);
        assert_eq!(ps.pool_size(), 20);
    }

    #[test]
    fn test_update_applies_gravity_and_drag() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = system(10);
        ps.burst(Vec2::ZERO, ParticleColor::Flap, 1, &mut rng);
        let before = ps.iter_active().next().unwrap().clone();
        ps.update(SIM_DT);
        let after = ps.iter_active().next().unwrap();

        assert!((after.pos - before.vel * SIM_DT).length() < 1e-4);
        assert!((after.vel.y - (before.vel.y + 400.0 * SIM_DT)).abs() < 1e-3);
        assert!((after.vel.x - before.vel.x * 0.98).abs() < 1e-3);
        assert!(after.life_fraction() < 1.0);
    }

    #[test]
    fn test_over_capacity_reclaims_oldest() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ps = system(3);
        ps.burst(Vec2::new(1.0, 0.0), ParticleColor::Flap, 1, &mut rng);
        ps.burst(Vec2::new(2.0, 0.0), ParticleColor::Flap, 1, &mut rng);
        ps.burst(Vec2::new(3.0, 0.0), ParticleColor::Flap, 1, &mut rng);
        ps.burst(Vec2::new(4.0, 0.0), ParticleColor::Score, 1, &mut rng);

        assert_eq!(ps.pool_size(), 3);
        assert_eq!(ps.active_count(), 3);
        let xs: Vec<f32> = ps.iter_active().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_clear_deactivates_everything() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ps = system(50);
        ps.explosion(Vec2::ZERO, ParticleColor::Death, 20, &mut rng);
        ps.clear();
        assert_eq!(ps.active_count(), 0);
        assert_eq!(ps.pool_size(), 20);
    }

    proptest! {
        #[test]
        fn prop_pool_never_exceeds_capacity(
            capacity in 1usize..64,
            requests in proptest::collection::vec((0usize..30, any::<bool>(), 0usize..20), 1..30),
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ps = system(capacity);
            for (count, explode, ticks) in requests {
                let before = ps.active_count();
                if explode {
                    ps.explosion(Vec2::ZERO, ParticleColor::Death, count, &mut rng);
                } else {
                    ps.burst(Vec2::ZERO, ParticleColor::Flap, count, &mut rng);
                }
                prop_assert_eq!(ps.active_count(), (before + count).min(capacity));
                prop_assert!(ps.pool_size() <= capacity);
                for _ in 0..ticks {
                    ps.update(SIM_DT);
                }
            }
        }
    }
}
