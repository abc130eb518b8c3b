//! Integer grid coordinates
//!
//! The field is a sparse map keyed by grid cells. `GridPos` is ordered so
//! iteration over the map is stable across runs.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// A discrete 3D grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell displaced by (dx, dy, dz); coordinates wrap at the i32 limits
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        self.translate(IVec3::new(dx, dy, dz))
    }

    /// Cell displaced by a vector; coordinates wrap at the i32 limits
    #[inline]
    pub fn translate(self, delta: IVec3) -> Self {
        Self::from(self.to_ivec3().wrapping_add(delta))
    }

    #[inline]
    pub fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Cell center in world space
    #[inline]
    pub fn to_world(self) -> Vec3 {
        self.to_ivec3().as_vec3()
    }

    /// Number of axes on which the two cells differ
    pub fn axes_changed(self, other: GridPos) -> usize {
        (self.x != other.x) as usize + (self.y != other.y) as usize + (self.z != other.z) as usize
    }
}

impl From<IVec3> for GridPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[i32; 3]> for GridPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// The 27 offsets of {-1, 0, 1}^3, dx outermost, then dy, then dz
pub fn moore_offsets() -> impl Iterator<Item = IVec3> {
    (-1..=1).flat_map(|dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| IVec3::new(dx, dy, dz))))
}

/// Coordinates `-(n/2) .. n - n/2` along one axis (n = 2 gives {-1, 0})
pub fn centered_span(n: u32) -> std::ops::Range<i32> {
    let n = n as i32;
    let start = -(n / 2);
    start..start + n
}
