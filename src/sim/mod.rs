//! Field world simulation
//!
//! Must stay deterministic under a seed:
//! - Seeded RNG only, always passed in
//! - Stable iteration order (cells sorted by grid position)
//! - No rendering dependencies

pub mod grid;
pub mod state;
pub mod tick;

pub use grid::{GridPos, centered_span, moore_offsets};
pub use state::{FieldWorld, Quark, QuarkFlavor};
pub use tick::{FieldClock, MAX_SUBSTEPS, tick};
