//! Scrolling pipe pairs and the pool that recycles them

use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collidable, Collider};
use crate::consts::FLOOR_Y;

/// A pipe pair with a vertical gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Leading (left) edge
    pub x: f32,
    pub gap_center: f32,
    pub gap_height: f32,
    pub width: f32,
    pub active: bool,
    /// Set once the bird has passed this pipe
    pub scored: bool,
}

impl Pipe {
    pub fn new(width: f32) -> Self {
        Self {
            x: 0.0,
            gap_center: 0.0,
            gap_height: 0.0,
            width,
            active: false,
            scored: false,
        }
    }

    pub fn setup(&mut self, x: f32, gap_center: f32, gap_height: f32) {
        self.x = x;
        self.gap_center = gap_center;
        self.gap_height = gap_height;
        self.active = true;
        self.scored = false;
    }

    pub fn update(&mut self, dt: f32, speed: f32) {
        self.x -= speed * dt;
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Rectangles above and below the gap, computed from the current x
    pub fn collision_boxes(&self) -> [Aabb; 2] {
        let top = self.gap_top();
        let bottom = self.gap_bottom();
        [
            Aabb::new(self.x, 0.0, self.width, top),
            Aabb::new(self.x, bottom, self.width, FLOOR_Y - bottom),
        ]
    }
}

impl Collidable for Pipe {
    fn collider(&self) -> Collider {
        Collider::Composite(self.collision_boxes())
    }
}

/// Grow-only pipe pool with an index free list
#[derive(Debug, Clone, Default)]
pub struct PipePool {
    pipes: Vec<Pipe>,
    /// Slots available for reuse
    free: Vec<usize>,
    /// Slots in play, oldest spawn first
    active: Vec<usize>,
    width: f32,
}

impl PipePool {
    pub fn new(width: f32) -> Self {
        Self {
            pipes: Vec::new(),
            free: Vec::new(),
            active: Vec::new(),
            width,
        }
    }

    /// Take an inactive pipe (allocating only when none is free) and mark it active
    pub fn acquire(&mut self) -> usize {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.pipes.push(Pipe::new(self.width));
                log::debug!("Pipe pool grew to {}", self.pipes.len());
                self.pipes.len() - 1
            }
        };
        self.pipes[slot].active = true;
        self.active.push(slot);
        slot
    }

    /// Return a pipe to the pool. No-op for inactive slots.
    pub fn release(&mut self, slot: usize) {
        let Some(pipe) = self.pipes.get_mut(slot) else {
            return;
        };
        if !pipe.active {
            return;
        }
        pipe.active = false;
        if let Some(idx) = self.active.iter().position(|&s| s == slot) {
            self.active.remove(idx);
        }
        self.free.push(slot);
    }

    /// Release every active pipe, keeping the storage
    pub fn clear(&mut self) {
        for slot in self.active.drain(..) {
            self.pipes[slot].active = false;
            self.free.push(slot);
        }
    }

    pub fn active_slots(&self) -> &[usize] {
        &self.active
    }

    pub fn get(&self, slot: usize) -> Option<&Pipe> {
        self.pipes.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Pipe> {
        self.pipes.get_mut(slot)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Pipe> {
        self.active.iter().map(move |&slot| &self.pipes[slot])
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of pipes ever allocated
    pub fn pool_size(&self) -> usize {
        self.pipes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{Circle, circle_vs_obstacle};
    use glam::Vec2;

    fn pipe_at(x: f32) -> Pipe {
        let mut pipe = Pipe::new(50.0);
        pipe.setup(x, 200.0, 160.0);
        pipe
    }

    #[test]
    fn test_collision_boxes_follow_gap() {
        let pipe = pipe_at(100.0);
        let [top, bottom] = pipe.collision_boxes();
        assert_eq!(top, Aabb::new(100.0, 0.0, 50.0, 120.0));
        assert_eq!(bottom, Aabb::new(100.0, 280.0, 50.0, FLOOR_Y - 280.0));
    }

    #[test]
    fn test_boxes_move_with_pipe() {
        let mut pipe = pipe_at(100.0);
        pipe.update(0.5, 120.0);
        assert_eq!(pipe.x, 40.0);
        assert_eq!(pipe.collision_boxes()[0].min.x, 40.0);
    }

    #[test]
    fn test_obstacle_hit_and_gap_pass() {
        let pipe = pipe_at(100.0);
        assert!(!circle_vs_obstacle(&Circle::new(Vec2::new(125.0, 200.0), 12.0), &pipe));
        assert!(circle_vs_obstacle(&Circle::new(Vec2::new(125.0, 125.0), 12.0), &pipe));
        assert!(circle_vs_obstacle(&Circle::new(Vec2::new(125.0, 275.0), 12.0), &pipe));
    }

    #[test]
    fn test_pool_reuses_released_slots() {
        let mut pool = PipePool::new(50.0);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.pool_size(), 2);

        pool.release(a);
        assert_eq!(pool.active_slots(), &[b]);
        assert!(!pool.get(a).unwrap().active);

        let c = pool.acquire();
        assert_eq!(c, a);
        assert_eq!(pool.pool_size(), 2);
        assert_eq!(pool.active_slots(), &[b, c]);
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool = PipePool::new(50.0);
        let a = pool.acquire();
        pool.release(a);
        pool.release(a);
        pool.acquire();
        pool.acquire();
        assert_eq!(pool.pool_size(), 2);
    }

    #[test]
    fn test_clear_keeps_storage() {
        let mut pool = PipePool::new(50.0);
        for _ in 0..3 {
            pool.acquire();
        }
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.pool_size(), 3);
        for _ in 0..3 {
            pool.acquire();
        }
        assert_eq!(pool.pool_size(), 3);
    }
}
