//! Triangle mesh export for the scene's boxes.
//!
//! Produces interleaved vertex data and u32 indices that a renderer can upload
//! directly. Each box gets its own 24 vertices (4 per face) so faces have flat
//! normals.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::scene_graph::{SceneDescription, Solid};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Unit cube faces: outward normal and corners in counter-clockwise order.
const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // Front (Z+)
    (
        [0.0, 0.0, 1.0],
        [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
    ),
    // Back (Z-)
    (
        [0.0, 0.0, -1.0],
        [[-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, -0.5, -0.5]],
    ),
    // Top (Y+)
    (
        [0.0, 1.0, 0.0],
        [[-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5]],
    ),
    // Bottom (Y-)
    (
        [0.0, -1.0, 0.0],
        [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
    ),
    // Right (X+)
    (
        [1.0, 0.0, 0.0],
        [[0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5], [0.5, -0.5, 0.5]],
    ),
    // Left (X-)
    (
        [-1.0, 0.0, 0.0],
        [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
    ),
];

pub const VERTICES_PER_BOX: usize = 24;
pub const INDICES_PER_BOX: usize = 36;

/// Append one box to the buffers.
pub fn push_box(solid: &Solid, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>) {
    let color = [solid.color.r, solid.color.g, solid.color.b, solid.opacity];
    for (normal, corners) in FACES {
        let base = vertices.len() as u32;
        for corner in corners {
            let p = Vec3::from_array(corner) * solid.size + solid.offset;
            vertices.push(Vertex::new(p.to_array(), normal, color));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Mesh buffers for a whole scene.
///
/// Opaque boxes come first and translucent boxes (glass) last, so a renderer
/// can draw `0..opaque_index_count` without blending and the rest with it.
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub opaque_index_count: usize,
}

impl SceneMesh {
    pub fn from_scene(scene: &SceneDescription) -> Self {
        let count = scene.solid_count();
        let mut mesh = Self {
            vertices: Vec::with_capacity(count * VERTICES_PER_BOX),
            indices: Vec::with_capacity(count * INDICES_PER_BOX),
            opaque_index_count: 0,
        };

        let (translucent, opaque): (Vec<Solid>, Vec<Solid>) =
            scene.solids().partition(Solid::is_translucent);
        for solid in &opaque {
            push_box(solid, &mut mesh.vertices, &mut mesh.indices);
        }
        mesh.opaque_index_count = mesh.indices.len();
        for solid in &translucent {
            push_box(solid, &mut mesh.vertices, &mut mesh.indices);
        }
        mesh
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
