//! Shape generation for 2D primitives
//!
//! Every function returns a triangle list in virtual units.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(x, y, w, h, [color; 4])
}

/// Rectangle with per-corner colors: top-left, top-right, bottom-right, bottom-left
pub fn gradient_rect(x: f32, y: f32, w: f32, h: f32, corners: [[f32; 4]; 4]) -> Vec<Vertex> {
    let [tl, tr, br, bl] = corners;
    let (x2, y2) = (x + w, y + h);
    vec![
        Vertex::new(x, y, tl),
        Vertex::new(x2, y, tr),
        Vertex::new(x, y2, bl),
        Vertex::new(x, y2, bl),
        Vertex::new(x2, y, tr),
        Vertex::new(x2, y2, br),
    ]
}

/// Top-to-bottom gradient
pub fn vertical_gradient(x: f32, y: f32, w: f32, h: f32, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(x, y, w, h, [top, top, bottom, bottom])
}

/// Left-to-right gradient
pub fn horizontal_gradient(x: f32, y: f32, w: f32, h: f32, left: [f32; 4], right: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(x, y, w, h, [left, right, right, left])
}

/// Hollow rectangle, the stroke sits inside the bounds
pub fn rect_outline(x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(w / 2.0).min(h / 2.0).max(0.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x, y, w, t, color));
    vertices.extend(rect(x, y + h - t, w, t, color));
    vertices.extend(rect(x, y + t, t, h - 2.0 * t, color));
    vertices.extend(rect(x + w - t, y + t, t, h - 2.0 * t, color));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Axis-aligned filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Ring centred on the radius, `thickness` wide
pub fn circle_outline(
    center: Vec2,
    radius: f32,
    thickness: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let inner_radius = (radius - thickness / 2.0).max(0.0);
    let outer_radius = radius + thickness / 2.0;
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Shift vertices in place
pub fn translate(vertices: &mut [Vertex], offset: Vec2) {
    if offset == Vec2::ZERO {
        return;
    }
    for v in vertices {
        v.position[0] += offset.x;
        v.position[1] += offset.y;
    }
}

/// Rotate about the origin by `angle` radians, then move to `origin`
pub fn transform(vertices: &mut [Vertex], angle: f32, origin: Vec2) {
    let rot = Vec2::from_angle(angle);
    for v in vertices {
        let p = origin + rot.rotate(Vec2::from(v.position));
        v.position = p.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_vertical_gradient_colors_by_row() {
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        for v in vertical_gradient(0.0, 0.0, 10.0, 10.0, top, bottom) {
            let expected = if v.position[1] == 0.0 { top } else { bottom };
            assert_eq!(v.color, expected);
        }
    }

    #[test]
    fn test_circle_stays_on_radius() {
        let center = Vec2::new(5.0, 5.0);
        for v in circle(center, 3.0, [1.0; 4], 16) {
            let d = Vec2::from(v.position).distance(center);
            assert!(d < 1e-4 || (d - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_outline_is_inside_bounds() {
        let verts = rect_outline(0.0, 0.0, 10.0, 6.0, 2.0, [1.0; 4]);
        assert_eq!(verts.len(), 24);
        assert!(verts.iter().all(|v| v.position[0] >= 0.0 && v.position[0] <= 10.0));
        assert!(verts.iter().all(|v| v.position[1] >= 0.0 && v.position[1] <= 6.0));
    }

    #[test]
    fn test_transform_rotates_then_moves() {
        let mut verts = vec![Vertex::new(1.0, 0.0, [1.0; 4])];
        transform(&mut verts, PI / 2.0, Vec2::new(10.0, 10.0));
        assert!((verts[0].position[0] - 10.0).abs() < 1e-5);
        assert!((verts[0].position[1] - 11.0).abs() < 1e-5);

        translate(&mut verts, Vec2::new(-10.0, 0.0));
        assert!(verts[0].position[0].abs() < 1e-5);
    }
}
