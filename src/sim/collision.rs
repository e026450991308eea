//! Collision detection between the bird's circle and axis-aligned boxes
//!
//! Pipes expose their rectangles through `Collidable`, so the tick loop tests
//! the bird against a pipe without knowing how many boxes it is made of.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pipe::Pipe;

/// A circle in playfield units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned box, `min` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Point of the box closest to `p`
    #[inline]
    pub fn nearest_point(&self, p: Vec2) -> Vec2 {
        p.max(self.min).min(self.max())
    }
}

/// Collision shape of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// A single box
    Single(Aabb),
    /// Two boxes hit-tested together (pipe above and below its gap)
    Composite([Aabb; 2]),
}

impl Collider {
    pub fn boxes(&self) -> &[Aabb] {
        match self {
            Collider::Single(b) => std::slice::from_ref(b),
            Collider::Composite(boxes) => boxes,
        }
    }
}

/// Anything the bird can crash into
pub trait Collidable {
    fn collider(&self) -> Collider;
}

impl Collidable for Aabb {
    fn collider(&self) -> Collider {
        Collider::Single(*self)
    }
}

/// Circle vs box: nearest-point test, exact tangency does not count
pub fn circle_vs_box(circle: &Circle, aabb: &Aabb) -> bool {
    let closest = aabb.nearest_point(circle.center);
    circle.center.distance_squared(closest) < circle.radius * circle.radius
}

/// Circle vs every box of a collider
pub fn circle_vs_collider(circle: &Circle, collider: &Collider) -> bool {
    collider.boxes().iter().any(|b| circle_vs_box(circle, b))
}

#[inline]
pub fn circle_vs_collidable<C: Collidable>(circle: &Circle, target: &C) -> bool {
    circle_vs_collider(circle, &target.collider())
}

/// Circle vs both rectangles of a pipe
#[inline]
pub fn circle_vs_obstacle(circle: &Circle, pipe: &Pipe) -> bool {
    circle_vs_collidable(circle, pipe)
}

/// Inclusive on all edges
pub fn point_in_box(point: Vec2, aabb: &Aabb) -> bool {
    let max = aabb.max();
    point.x >= aabb.min.x && point.x <= max.x && point.y >= aabb.min.y && point.y <= max.y
}

pub fn circle_vs_circle(a: &Circle, b: &Circle) -> bool {
    let r = a.radius + b.radius;
    a.center.distance_squared(b.center) < r * r
}

/// Strict overlap; boxes sharing an edge do not collide
pub fn box_vs_box(a: &Aabb, b: &Aabb) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// Unit vector from the nearest box point toward the circle center.
/// Falls back to straight up when the center is on or inside the box.
pub fn collision_normal(circle: &Circle, aabb: &Aabb) -> Vec2 {
    let closest = aabb.nearest_point(circle.center);
    let delta = circle.center - closest;
    if delta.length_squared() == 0.0 {
        return Vec2::NEG_Y;
    }
    delta.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_box() -> Aabb {
        Aabb::new(100.0, 100.0, 50.0, 80.0)
    }

    #[test]
    fn test_circle_inside_box_hits() {
        let circle = Circle::new(Vec2::new(125.0, 140.0), 1.0);
        assert!(circle_vs_box(&circle, &unit_box()));
    }

    #[test]
    fn test_exact_tangency_is_not_a_hit() {
        // Touches the left edge exactly
        let circle = Circle::new(Vec2::new(90.0, 140.0), 10.0);
        assert!(!circle_vs_box(&circle, &unit_box()));

        let circle = Circle::new(Vec2::new(90.01, 140.0), 10.0);
        assert!(circle_vs_box(&circle, &unit_box()));
    }

    #[test]
    fn test_corner_uses_euclidean_distance() {
        // 7/7 away from the corner on both axes: ~9.9 units, radius 10 hits
        let circle = Circle::new(Vec2::new(93.0, 93.0), 10.0);
        assert!(circle_vs_box(&circle, &unit_box()));
        // 8/8 away: ~11.3 units, radius 10 misses even though each axis is within range
        let circle = Circle::new(Vec2::new(92.0, 92.0), 10.0);
        assert!(!circle_vs_box(&circle, &unit_box()));
    }

    #[test]
    fn test_composite_hits_either_box() {
        let collider = Collider::Composite([
            Aabb::new(0.0, 0.0, 10.0, 10.0),
            Aabb::new(0.0, 50.0, 10.0, 10.0),
        ]);
        assert!(circle_vs_collider(&Circle::new(Vec2::new(5.0, 55.0), 2.0), &collider));
        assert!(circle_vs_collider(&Circle::new(Vec2::new(5.0, 5.0), 2.0), &collider));
        assert!(!circle_vs_collider(&Circle::new(Vec2::new(5.0, 30.0), 2.0), &collider));
    }

    #[test]
    fn test_point_in_box_is_inclusive() {
        let b = unit_box();
        assert!(point_in_box(Vec2::new(100.0, 100.0), &b));
        assert!(point_in_box(Vec2::new(150.0, 180.0), &b));
        assert!(!point_in_box(Vec2::new(150.1, 180.0), &b));
    }

    #[test]
    fn test_box_vs_box_shared_edge() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Aabb::new(9.0, 9.0, 10.0, 10.0);
        assert!(!box_vs_box(&a, &touching));
        assert!(box_vs_box(&a, &overlapping));
    }

    #[test]
    fn test_circle_vs_circle() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        assert!(circle_vs_circle(&a, &Circle::new(Vec2::new(9.0, 0.0), 5.0)));
        assert!(!circle_vs_circle(&a, &Circle::new(Vec2::new(10.0, 0.0), 5.0)));
    }

    #[test]
    fn test_collision_normal() {
        let b = unit_box();
        let left = Circle::new(Vec2::new(95.0, 140.0), 10.0);
        assert_eq!(collision_normal(&left, &b), Vec2::new(-1.0, 0.0));

        let inside = Circle::new(Vec2::new(120.0, 120.0), 10.0);
        assert_eq!(collision_normal(&inside, &b), Vec2::NEG_Y);
    }

    proptest! {
        #[test]
        fn prop_far_outside_never_hits(
            radius in 0.5f32..40.0,
            gap_x in 0.01f32..200.0,
            gap_y in 0.01f32..200.0,
            left in any::<bool>(),
            above in any::<bool>(),
        ) {
            let b = unit_box();
            let max = b.max();
            let x = if left { b.min.x - radius - gap_x } else { max.x + radius + gap_x };
            let y = if above { b.min.y - radius - gap_y } else { max.y + radius + gap_y };
            let circle = Circle::new(Vec2::new(x, y), radius);
            prop_assert!(!circle_vs_box(&circle, &b));
        }

        #[test]
        fn prop_center_inside_always_hits(
            fx in 0.0f32..=1.0,
            fy in 0.0f32..=1.0,
            radius in 0.01f32..40.0,
        ) {
            let b = unit_box();
            let center = b.min + b.size * Vec2::new(fx, fy);
            prop_assert!(circle_vs_box(&Circle::new(center, radius), &b));
        }
    }
}
