//! Scene builder: turns a `GameState` into a triangle list
//!
//! Draw order: sky and clouds, pipes, bird, ground, particles. The whole
//! scene is shifted by the camera shake offset. HUD text is left to the host.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::{FLOOR_Y, GROUND_HEIGHT, VIRTUAL_HEIGHT, VIRTUAL_WIDTH};
use crate::sim::{Bird, GameState, ParticleColor, Pipe};

const CIRCLE_SEGMENTS: u32 = 24;
const PARTICLE_SEGMENTS: u32 = 8;
const PIPE_CAP_HEIGHT: f32 = 20.0;
const PIPE_CAP_OVERHANG: f32 = 5.0;
const DEBUG_LINE: f32 = 2.0;

/// Append the whole frame to `out`
pub fn build(state: &GameState, out: &mut Vec<Vertex>) {
    let start = out.len();

    background(state.bg_offset, out);
    for pipe in state.pipes.iter_active() {
        pipe_pair(pipe, state.debug, out);
    }
    bird(&state.bird, state.debug, out);
    ground(state.ground_offset, out);
    for p in state.particles.iter_active() {
        let alpha = p.life_fraction();
        let color = with_alpha(particle_color(p.color), alpha);
        out.extend(shapes::circle(p.pos, p.size * alpha, color, PARTICLE_SEGMENTS));
    }

    shapes::translate(&mut out[start..], state.shake.offset);
}

pub fn particle_color(color: ParticleColor) -> [f32; 4] {
    match color {
        ParticleColor::Flap => colors::PARTICLE_FLAP,
        ParticleColor::Score => colors::PARTICLE_SCORE,
        ParticleColor::Death => colors::PARTICLE_DEATH,
    }
}

fn background(bg_offset: f32, out: &mut Vec<Vertex>) {
    out.extend(shapes::vertical_gradient(
        0.0,
        0.0,
        VIRTUAL_WIDTH,
        VIRTUAL_HEIGHT,
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));

    // Parallax clouds; `%` keeps the sign so the leftmost cloud can sit off-screen
    for i in -1..4 {
        let x = (i as f32 * 100.0 - bg_offset) % (VIRTUAL_WIDTH + 100.0);
        cloud(x, 60.0, out);
        cloud(x + 50.0, 100.0, out);
    }
}

fn cloud(x: f32, y: f32, out: &mut Vec<Vertex>) {
    for (dx, r) in [(0.0, 20.0), (15.0, 25.0), (35.0, 20.0)] {
        out.extend(shapes::circle(Vec2::new(x + dx, y), r, colors::CLOUD, CIRCLE_SEGMENTS));
    }
}

/// Pipe body shaded dark at the edges and light in the middle
fn pipe_body(x: f32, y: f32, w: f32, h: f32, out: &mut Vec<Vertex>) {
    if h <= 0.0 {
        return;
    }
    let half = w / 2.0;
    out.extend(shapes::horizontal_gradient(x, y, half, h, colors::PIPE_EDGE, colors::PIPE_CENTER));
    out.extend(shapes::horizontal_gradient(x + half, y, half, h, colors::PIPE_CENTER, colors::PIPE_EDGE));
}

fn pipe_pair(pipe: &Pipe, debug: bool, out: &mut Vec<Vertex>) {
    let top = pipe.gap_top();
    let bottom = pipe.gap_bottom();
    let bottom_height = FLOOR_Y - bottom;
    let cap_x = pipe.x - PIPE_CAP_OVERHANG;
    let cap_w = pipe.width + PIPE_CAP_OVERHANG * 2.0;

    pipe_body(pipe.x, 0.0, pipe.width, top, out);
    pipe_body(cap_x, top - PIPE_CAP_HEIGHT, cap_w, PIPE_CAP_HEIGHT, out);
    pipe_body(pipe.x, bottom, pipe.width, bottom_height, out);
    pipe_body(cap_x, bottom, cap_w, PIPE_CAP_HEIGHT, out);

    out.extend(shapes::rect(pipe.x + 2.0, 0.0, 6.0, top, colors::PIPE_HIGHLIGHT));
    out.extend(shapes::rect(pipe.x + 2.0, bottom, 6.0, bottom_height, colors::PIPE_HIGHLIGHT));

    if debug {
        for b in pipe.collision_boxes() {
            out.extend(shapes::rect_outline(
                b.min.x,
                b.min.y,
                b.size.x,
                b.size.y,
                DEBUG_LINE,
                colors::DEBUG_OUTLINE,
            ));
        }
    }
}

fn bird(bird: &Bird, debug: bool, out: &mut Vec<Vertex>) {
    let body = bird.radius * 1.5;
    let mut verts = Vec::with_capacity(CIRCLE_SEGMENTS as usize * 18);

    // Built around the origin, facing right, then rotated into place
    verts.extend(shapes::circle(Vec2::ZERO, body, colors::BIRD, CIRCLE_SEGMENTS));
    verts.extend(shapes::circle_outline(Vec2::ZERO, body, 2.0, colors::BIRD_WING, CIRCLE_SEGMENTS));
    verts.extend(shapes::ellipse(
        Vec2::new(-body * 0.3, bird.wing.offset()),
        Vec2::new(body * 0.6, body * 0.4),
        colors::BIRD_WING,
        CIRCLE_SEGMENTS,
    ));
    verts.extend(shapes::circle(
        Vec2::new(body * 0.3, -body * 0.3),
        body * 0.3,
        colors::BIRD_EYE,
        CIRCLE_SEGMENTS / 2,
    ));
    verts.extend(shapes::circle(
        Vec2::new(body * 0.4, -body * 0.3),
        body * 0.15,
        colors::BIRD_PUPIL,
        CIRCLE_SEGMENTS / 2,
    ));
    verts.extend(shapes::triangle(
        Vec2::new(body, 0.0),
        Vec2::new(body * 1.5, -body * 0.2),
        Vec2::new(body * 1.5, body * 0.2),
        colors::BIRD_BEAK,
    ));
    shapes::transform(&mut verts, bird.rotation.to_radians(), bird.pos);
    out.extend(verts);

    if debug {
        out.extend(shapes::circle_outline(
            bird.pos,
            bird.radius,
            DEBUG_LINE,
            colors::DEBUG_OUTLINE,
            CIRCLE_SEGMENTS,
        ));
    }
}

fn ground(ground_offset: f32, out: &mut Vec<Vertex>) {
    out.extend(shapes::vertical_gradient(
        0.0,
        FLOOR_Y,
        VIRTUAL_WIDTH,
        GROUND_HEIGHT,
        colors::GROUND_TOP,
        colors::GROUND_BOTTOM,
    ));

    let stripes = (VIRTUAL_WIDTH / 64.0).ceil() as i32 + 1;
    for i in -1..stripes {
        let x = (i as f32 * 64.0 - ground_offset) % (VIRTUAL_WIDTH + 64.0);
        out.extend(shapes::rect(x, FLOOR_Y, 32.0, 8.0, colors::GROUND_STRIPE));
        out.extend(shapes::rect(x + 16.0, FLOOR_Y + 20.0, 32.0, 8.0, colors::GROUND_STRIPE));
    }
}
