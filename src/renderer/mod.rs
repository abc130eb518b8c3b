//! Scene extraction for an external visualizer
//!
//! Produces vertex buffers and snapshots only; no GPU or window code.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::{Scene, SceneSnapshot};
pub use vertex::{Vertex, colors};
