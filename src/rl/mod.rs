//! Reinforcement learning on the field world
//!
//! - `env`: grid-walking environment with an interact action
//! - `encoding`: observation → Q-table row
//! - `agent`: tabular ε-greedy Q-learning
//! - `train`: finite episode loop with a step limit
//! - `best`: top episodes by total reward

pub mod agent;
pub mod best;
pub mod encoding;
pub mod env;
pub mod train;

pub use agent::QLearningAgent;
pub use best::{BestEpisode, BestEpisodes};
pub use encoding::{StateEncoder, StateIndex};
pub use env::{Action, Observation, QuantumEnv, StepResult};
pub use train::{EpisodeSummary, TrainingReport, run_episode, train};
