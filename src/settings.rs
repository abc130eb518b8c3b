//! Simulation and training settings
//!
//! Loaded from an optional JSON file; every field falls back to the
//! reference configuration.

use std::path::Path;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Training length presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrainingPreset {
    Smoke,
    #[default]
    Reference,
    Long,
}

impl TrainingPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingPreset::Smoke => "Smoke",
            TrainingPreset::Reference => "Reference",
            TrainingPreset::Long => "Long",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "smoke" | "quick" => Some(TrainingPreset::Smoke),
            "reference" | "ref" => Some(TrainingPreset::Reference),
            "long" => Some(TrainingPreset::Long),
            _ => None,
        }
    }

    /// Episodes to train for this preset
    pub fn episodes(&self) -> u32 {
        match self {
            TrainingPreset::Smoke => 10,
            TrainingPreset::Reference => 1000,
            TrainingPreset::Long => 10_000,
        }
    }

    /// Step limit per episode
    pub fn max_steps(&self) -> u32 {
        match self {
            TrainingPreset::Smoke => 50,
            TrainingPreset::Reference => 200,
            TrainingPreset::Long => 500,
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Same seed, separate stream (e.g. one for the world, one for the agent)
    pub fn with_stream(&self, stream: u64) -> Self {
        Self {
            seed: self.seed,
            stream,
        }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Field world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Side length N of the initial N×N (x, z) neighborhood at y = 0
    pub neighborhood: u32,
    pub initial_energy_max: f32,
    pub curvature_max: f32,
    pub quark_range: i32,
    pub fluctuation_probability: f64,
    pub fluctuation_delta: f32,
    pub interact_delta: f32,
    pub reward_baseline: f32,
    /// Agent position after every reset
    pub agent_start: [i32; 3],
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            neighborhood: FIELD_NEIGHBORHOOD,
            initial_energy_max: INITIAL_ENERGY_MAX,
            curvature_max: CURVATURE_MAX,
            quark_range: QUARK_RANGE,
            fluctuation_probability: FLUCTUATION_PROBABILITY,
            fluctuation_delta: FLUCTUATION_DELTA,
            interact_delta: INTERACT_DELTA,
            reward_baseline: REWARD_BASELINE,
            agent_start: [0, 1, 0],
        }
    }
}

/// Q-learning hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// α in (0, 1]
    pub learning_rate: f32,
    /// γ in [0, 1]
    pub discount_factor: f32,
    /// ε in [0, 1]
    pub epsilon: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            learning_rate: LEARNING_RATE,
            discount_factor: DISCOUNT_FACTOR,
            epsilon: EPSILON,
        }
    }
}

/// Episode loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub episodes: u32,
    /// Episodes end after this many steps
    pub max_steps: u32,
    /// Log progress every N episodes (0 = never)
    pub log_interval: u32,
    /// Fluctuate the training world every N steps (0 = never)
    pub fluctuate_every: u32,
    pub state_size: usize,
    pub encoder_levels: u32,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self::from_preset(TrainingPreset::default())
    }
}

impl TrainingSettings {
    pub fn from_preset(preset: TrainingPreset) -> Self {
        Self {
            episodes: preset.episodes(),
            max_steps: preset.max_steps(),
            log_interval: 100,
            fluctuate_every: 0,
            state_size: STATE_SIZE,
            encoder_levels: ENCODER_LEVELS,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    pub world: WorldSettings,
    pub agent: AgentSettings,
    pub training: TrainingSettings,
    /// Visualization ticks to run after training
    pub view_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            world: WorldSettings::default(),
            agent: AgentSettings::default(),
            training: TrainingSettings::default(),
            view_frames: 60,
        }
    }
}

impl Settings {
    /// Create settings from a training preset
    pub fn from_preset(preset: TrainingPreset) -> Self {
        Self {
            training: TrainingSettings::from_preset(preset),
            ..Self::default()
        }
    }

    /// Load settings from a JSON file; missing fields use defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn rng_state(&self) -> RngState {
        RngState::new(self.seed)
    }

    /// Reject configurations that would iterate zero times or index out of bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        let training = &self.training;
        if training.episodes == 0 {
            return Err(ConfigError::NoEpisodes);
        }
        if training.max_steps == 0 {
            return Err(ConfigError::NoSteps);
        }
        if training.state_size == 0 {
            return Err(ConfigError::EmptyStateSpace);
        }
        if training.encoder_levels == 0 {
            return Err(ConfigError::NoEncoderLevels);
        }
        if self.world.neighborhood == 0 {
            return Err(ConfigError::EmptyNeighborhood);
        }

        if self.world.quark_range < 0 {
            return Err(ConfigError::NegativeQuarkRange(self.world.quark_range));
        }

        let agent = &self.agent;
        let world = &self.world;
        check_range("learning_rate", agent.learning_rate.into(), f32::MIN_POSITIVE.into(), 1.0)?;
        check_range("discount_factor", agent.discount_factor.into(), 0.0, 1.0)?;
        check_range("epsilon", agent.epsilon.into(), 0.0, 1.0)?;
        check_range("fluctuation_probability", world.fluctuation_probability, 0.0, 1.0)?;
        check_range("fluctuation_delta", world.fluctuation_delta.into(), 0.0, 1.0)?;
        check_range("interact_delta", world.interact_delta.into(), 0.0, 1.0)?;
        check_range("initial_energy_max", world.initial_energy_max.into(), 0.0, 1.0)?;
        check_range("curvature_max", world.curvature_max.into(), 0.0, 1.0)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons, so test for containment
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
