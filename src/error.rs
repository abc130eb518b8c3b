//! Error types
//!
//! Configuration problems fail fast before any world is built. Lookups of
//! absent field cells or Q-table rows are not errors: they read as 0.0.

use std::error::Error;
use std::fmt;

/// Invalid or unreadable configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Training would run zero episodes
    NoEpisodes,
    /// Episodes would terminate before taking a step
    NoSteps,
    /// Q-table would have no rows
    EmptyStateSpace,
    /// Field neighborhood would have no cells
    EmptyNeighborhood,
    /// Encoder and agent disagree on the number of states
    StateSizeMismatch { encoder: usize, agent: usize },
    /// Agent has a different number of actions than the environment
    ActionSizeMismatch { env: usize, agent: usize },
    /// Quarks need a non-negative spawn range
    NegativeQuarkRange(i32),
    /// Encoder needs at least one quantization level
    NoEncoderLevels,
    /// A rate parameter is outside its allowed range
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Settings file could not be read
    Io(std::io::Error),
    /// Settings file is not valid JSON for `Settings`
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEpisodes => write!(f, "episode count must be at least 1"),
            Self::NoSteps => write!(f, "max steps per episode must be at least 1"),
            Self::EmptyStateSpace => write!(f, "state size must be at least 1"),
            Self::EmptyNeighborhood => write!(f, "field neighborhood must be at least 1"),
            Self::StateSizeMismatch { encoder, agent } => {
                write!(f, "encoder produces {encoder} states but agent has {agent}")
            }
            Self::ActionSizeMismatch { env, agent } => {
                write!(f, "environment has {env} actions but agent has {agent}")
            }
            Self::NegativeQuarkRange(range) => {
                write!(f, "quark_range = {range} must not be negative")
            }
            Self::NoEncoderLevels => write!(f, "encoder levels must be at least 1"),
            Self::OutOfRange {
                name,
                value,
                min,
                max,
            } => write!(f, "{name} = {value} is outside [{min}, {max}]"),
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Index errors from the learning loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RlError {
    /// State index does not address a Q-table row
    StateOutOfRange { index: usize, state_size: usize },
    /// Action index does not name an action
    ActionOutOfRange { index: usize, action_size: usize },
}

impl fmt::Display for RlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateOutOfRange { index, state_size } => {
                write!(f, "state index {index} outside [0, {state_size})")
            }
            Self::ActionOutOfRange { index, action_size } => {
                write!(f, "action index {index} outside [0, {action_size})")
            }
        }
    }
}

impl Error for RlError {}

/// Failures of a training run
#[derive(Debug)]
pub enum TrainError {
    Config(ConfigError),
    Rl(RlError),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid training configuration: {e}"),
            Self::Rl(e) => write!(f, "learning step failed: {e}"),
        }
    }
}

impl Error for TrainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Rl(e) => Some(e),
        }
    }
}

impl From<ConfigError> for TrainError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RlError> for TrainError {
    fn from(e: RlError) -> Self {
        Self::Rl(e)
    }
}
