//! Vertex types for 2D rendering
//!
//! Positions are in virtual playfield units; the presenter maps them to clip space.

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Palette for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.6, 0.98, 0.6, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    pub const PIPE_EDGE: [f32; 4] = [0.13, 0.55, 0.13, 1.0];
    pub const PIPE_CENTER: [f32; 4] = [0.2, 0.8, 0.2, 1.0];
    pub const PIPE_HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.2];
    pub const GROUND_TOP: [f32; 4] = [0.56, 0.74, 0.56, 1.0];
    pub const GROUND_BOTTOM: [f32; 4] = [0.33, 0.42, 0.18, 1.0];
    pub const GROUND_STRIPE: [f32; 4] = [0.42, 0.56, 0.14, 1.0];
    pub const BIRD: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BIRD_WING: [f32; 4] = [1.0, 0.65, 0.0, 1.0]; // Also the body outline
    pub const BIRD_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BIRD_PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BIRD_BEAK: [f32; 4] = [1.0, 0.39, 0.28, 1.0];
    pub const PARTICLE_FLAP: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const PARTICLE_SCORE: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const PARTICLE_DEATH: [f32; 4] = [1.0, 0.27, 0.27, 1.0];
    pub const DEBUG_OUTLINE: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const LETTERBOX: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}

/// Same color with its alpha scaled
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}
