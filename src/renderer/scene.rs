//! Scene extraction for the visualizer
//!
//! The visualizer consumes two things from the world: quark placements and
//! field energies. `Scene` turns them into flat vertex buffers;
//! `SceneSnapshot` is the same data as serializable records.

use serde::{Deserialize, Serialize};

use super::shapes::{QUARK_HALF_SIZE, cube, field_plane};
use super::vertex::{Vertex, colors};
use crate::sim::{FieldWorld, GridPos, QuarkFlavor};

/// CPU-side vertex buffers for one frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub quark_vertices: Vec<Vertex>,
    /// Translucent, drawn after the opaque quarks
    pub field_vertices: Vec<Vertex>,
}

impl Scene {
    pub fn build(world: &FieldWorld) -> Self {
        let quark_vertices = world
            .quarks()
            .iter()
            .enumerate()
            .flat_map(|(i, q)| cube(q.position.to_world(), QUARK_HALF_SIZE, colors::quark(i)))
            .collect();

        let field_vertices = world
            .cells()
            .flat_map(|(pos, energy)| field_plane(pos.to_world(), energy))
            .collect();

        Self {
            quark_vertices,
            field_vertices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.quark_vertices.len() + self.field_vertices.len()
    }

    /// Raw bytes ready for upload
    pub fn quark_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.quark_vertices)
    }

    pub fn field_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.field_vertices)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarkRecord {
    pub flavor: QuarkFlavor,
    pub position: GridPos,
    pub color_charge: u8,
    pub rgb: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub position: GridPos,
    pub energy: f32,
    pub curvature: f32,
}

/// Serializable view of a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub ticks: u64,
    pub quarks: Vec<QuarkRecord>,
    pub field: Vec<FieldRecord>,
}

impl SceneSnapshot {
    pub fn capture(world: &FieldWorld) -> Self {
        Self {
            ticks: world.ticks,
            quarks: world
                .quarks()
                .iter()
                .enumerate()
                .map(|(i, q)| QuarkRecord {
                    flavor: q.flavor,
                    position: q.position,
                    color_charge: q.color_charge,
                    rgb: colors::quark(i),
                })
                .collect(),
            field: world
                .cells()
                .map(|(position, energy)| FieldRecord {
                    position,
                    energy,
                    curvature: world.curvature_at(position),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
