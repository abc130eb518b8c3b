//! Mesh generation for quark cubes and field planes

use glam::{Vec3, Vec4};

use super::vertex::{Vertex, colors};

/// Half extent of a quark cube
pub const QUARK_HALF_SIZE: f32 = 0.3;
/// Half extent of a field plane
pub const PLANE_HALF_SIZE: f32 = 0.5;

/// Axis-aligned cube as 12 triangles (36 vertices)
pub fn cube(center: Vec3, half: f32, color: [f32; 3]) -> Vec<Vertex> {
    let color = Vec4::new(color[0], color[1], color[2], 1.0);
    let corner = |sx: f32, sy: f32, sz: f32| center + Vec3::new(sx, sy, sz) * half;

    // Faces in +x, -x, +y, -y, +z, -z order
    let faces = [
        [corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(1.0, -1.0, 1.0)],
        [corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0), corner(-1.0, -1.0, -1.0)],
        [corner(-1.0, 1.0, -1.0), corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0)],
        [corner(-1.0, -1.0, 1.0), corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0)],
        [corner(-1.0, -1.0, 1.0), corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)],
        [corner(1.0, -1.0, -1.0), corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0)],
    ];

    let mut vertices = Vec::with_capacity(36);
    for [a, b, c, d] in faces {
        quad(&mut vertices, a, b, c, d, color);
    }
    vertices
}

/// Horizontal translucent square centered on a field cell; alpha is the cell energy
pub fn field_plane(center: Vec3, alpha: f32) -> Vec<Vertex> {
    let [r, g, b] = colors::FIELD;
    let color = Vec4::new(r, g, b, alpha.clamp(0.0, 1.0));
    let h = PLANE_HALF_SIZE;
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        center + Vec3::new(-h, 0.0, -h),
        center + Vec3::new(h, 0.0, -h),
        center + Vec3::new(h, 0.0, h),
        center + Vec3::new(-h, 0.0, h),
        color,
    );
    vertices
}

/// Two triangles: (a, b, c) and (a, c, d)
fn quad(out: &mut Vec<Vertex>, a: Vec3, b: Vec3, c: Vec3, d: Vec3, color: Vec4) {
    for p in [a, b, c, a, c, d] {
        out.push(Vertex::at(p, color));
    }
}
