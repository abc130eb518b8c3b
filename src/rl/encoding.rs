//! Observation discretization
//!
//! The Q-table is indexed by discrete states, but the environment emits a
//! vector of 27 energies. Each sample is quantized into `levels` bins, the
//! bin sequence is hashed with FNV-1a and reduced modulo `state_size`.
//! Distinct observations may collide; identical observations never split.

use serde::{Deserialize, Serialize};

use super::env::Observation;
use crate::error::ConfigError;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Row index into the Q-table, always below the encoder's state size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateIndex(usize);

impl StateIndex {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Maps observations into `[0, state_size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEncoder {
    state_size: usize,
    levels: u32,
}

impl StateEncoder {
    pub fn new(state_size: usize, levels: u32) -> Result<Self, ConfigError> {
        if state_size == 0 {
            return Err(ConfigError::EmptyStateSpace);
        }
        if levels == 0 {
            return Err(ConfigError::NoEncoderLevels);
        }
        Ok(Self { state_size, levels })
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    /// Bin of a single energy sample in `[0, levels)`
    #[inline]
    pub fn quantize(&self, sample: f32) -> u32 {
        let scaled = (sample.clamp(0.0, 1.0) * self.levels as f32) as u32;
        scaled.min(self.levels - 1)
    }

    pub fn encode(&self, observation: &Observation) -> StateIndex {
        let hash = observation.samples.iter().fold(FNV_OFFSET, |hash, &s| {
            self.quantize(s)
                .to_le_bytes()
                .iter()
                .fold(hash, |h, &b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
        });
        StateIndex((hash % self.state_size as u64) as usize)
    }
}
