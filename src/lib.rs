//! Quark Field - a toy quantum-field voxel world with a learning agent
//!
//! Core modules:
//! - `sim`: Field world (sparse energy grid, quarks, seeded fluctuation)
//! - `rl`: Q-learning environment, agent and training loop
//! - `renderer`: CPU-side scene extraction for an external visualizer
//! - `settings`: Data-driven configuration

pub mod error;
pub mod renderer;
pub mod rl;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RlError, TrainError};
pub use settings::{RngState, Settings};

/// World and learning constants (reference configuration)
pub mod consts {
    /// Visualization cadence (the field fluctuates once per frame)
    pub const VIEW_DT: f32 = 1.0 / 60.0;

    /// Side length of the initial (x, z) neighborhood at y = 0
    pub const FIELD_NEIGHBORHOOD: u32 = 2;
    /// Initial energy is drawn from [0, INITIAL_ENERGY_MAX]
    pub const INITIAL_ENERGY_MAX: f32 = 0.5;
    /// Spacetime curvature is drawn from [-CURVATURE_MAX, CURVATURE_MAX]
    pub const CURVATURE_MAX: f32 = 0.1;
    /// Quarks spawn uniformly in [-QUARK_RANGE, QUARK_RANGE] per axis
    pub const QUARK_RANGE: i32 = 8;

    /// Per-cell chance of a fluctuation each tick
    pub const FLUCTUATION_PROBABILITY: f64 = 0.01;
    /// Fluctuation delta is drawn from [-FLUCTUATION_DELTA, FLUCTUATION_DELTA]
    pub const FLUCTUATION_DELTA: f32 = 0.2;
    /// Interact delta is drawn from [-INTERACT_DELTA, INTERACT_DELTA]
    pub const INTERACT_DELTA: f32 = 0.3;
    /// Energy above this yields positive reward
    pub const REWARD_BASELINE: f32 = 0.5;

    /// Number of Q-table rows
    pub const STATE_SIZE: usize = 16;
    /// Energy samples per observation ({-1, 0, 1}^3 around the agent)
    pub const OBSERVATION_LEN: usize = 27;
    /// Quantization bins per sample when hashing observations
    pub const ENCODER_LEVELS: u32 = 4;

    pub const LEARNING_RATE: f32 = 0.1;
    pub const DISCOUNT_FACTOR: f32 = 0.52;
    pub const EPSILON: f32 = 0.225;
}

/// Clamp an energy value to the valid [0, 1] band
#[inline]
pub fn clamp_energy(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
