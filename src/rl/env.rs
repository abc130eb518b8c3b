//! Reinforcement-learning environment over the field world
//!
//! The agent walks the grid one unit at a time and can poke the field at
//! its own cell. Episodes never end on their own; the training loop
//! imposes a step limit.

use glam::IVec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::OBSERVATION_LEN;
use crate::error::RlError;
use crate::settings::{RngState, WorldSettings};
use crate::sim::{FieldWorld, GridPos, moore_offsets};

/// Discrete agent actions, in Q-table column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// +x
    Forward,
    /// -x
    Backward,
    /// +y
    Left,
    /// -y
    Right,
    /// +z
    Up,
    /// -z
    Down,
    /// Perturb the field at the agent's cell
    Interact,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Interact,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Unit displacement for movement actions, `None` for `Interact`
    pub fn delta(self) -> Option<IVec3> {
        match self {
            Action::Forward => Some(IVec3::X),
            Action::Backward => Some(IVec3::NEG_X),
            Action::Left => Some(IVec3::Y),
            Action::Right => Some(IVec3::NEG_Y),
            Action::Up => Some(IVec3::Z),
            Action::Down => Some(IVec3::NEG_Z),
            Action::Interact => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Forward => "move_forward",
            Action::Backward => "move_backward",
            Action::Left => "move_left",
            Action::Right => "move_right",
            Action::Up => "move_up",
            Action::Down => "move_down",
            Action::Interact => "interact",
        }
    }
}

/// Energy sampled at the 27 cells around the agent (absent cells read 0.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub samples: [f32; OBSERVATION_LEN],
}

impl Observation {
    /// Sample `world` around `center`, dx outermost, then dy, then dz
    pub fn sample(world: &FieldWorld, center: GridPos) -> Self {
        let mut samples = [0.0; OBSERVATION_LEN];
        for (slot, offset) in samples.iter_mut().zip(moore_offsets()) {
            *slot = world.energy_at(center.translate(offset));
        }
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at the agent's own cell
    pub fn center(&self) -> f32 {
        self.samples[OBSERVATION_LEN / 2]
    }
}

/// Outcome of a single environment step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    /// Always false: the environment has no terminal states
    pub done: bool,
}

/// The field world seen as an RL environment
#[derive(Debug, Clone)]
pub struct QuantumEnv {
    world: FieldWorld,
    agent: GridPos,
    settings: WorldSettings,
    rng: Pcg32,
}

impl QuantumEnv {
    pub fn new(settings: WorldSettings, rng_state: RngState) -> Self {
        let mut rng = rng_state.to_rng();
        let world = FieldWorld::new(&settings, &mut rng);
        Self {
            world,
            agent: GridPos::from(settings.agent_start),
            settings,
            rng,
        }
    }

    pub fn world(&self) -> &FieldWorld {
        &self.world
    }

    pub fn agent_position(&self) -> GridPos {
        self.agent
    }

    /// Teleport the agent (tests and scripted scenarios)
    pub fn set_agent_position(&mut self, pos: GridPos) {
        self.agent = pos;
    }

    pub fn start_position(&self) -> GridPos {
        GridPos::from(self.settings.agent_start)
    }

    pub fn observe(&self) -> Observation {
        Observation::sample(&self.world, self.agent)
    }

    /// Energy at the agent's cell minus the baseline
    pub fn reward(&self) -> f32 {
        self.world.energy_at(self.agent) - self.settings.reward_baseline
    }

    /// Perturb the agent's cell if it is part of the field; otherwise no effect
    pub fn interact(&mut self) -> bool {
        self.world
            .perturb_cell(self.agent, self.settings.interact_delta, &mut self.rng)
    }

    /// One background fluctuation round on the environment's world
    pub fn fluctuate(&mut self) {
        crate::sim::tick(&mut self.world, &self.settings, &mut self.rng);
    }

    pub fn step(&mut self, action: Action) -> StepResult {
        match action.delta() {
            Some(delta) => self.agent = self.agent.translate(delta),
            None => {
                self.interact();
            }
        }

        StepResult {
            observation: self.observe(),
            reward: self.reward(),
            done: false,
        }
    }

    /// Step with a raw action index
    pub fn step_index(&mut self, index: usize) -> Result<StepResult, RlError> {
        let action = Action::from_index(index).ok_or(RlError::ActionOutOfRange {
            index,
            action_size: Action::COUNT,
        })?;
        Ok(self.step(action))
    }

    /// Fresh world from the environment's RNG stream, agent back at the start
    pub fn reset(&mut self) -> Observation {
        self.world = FieldWorld::new(&self.settings, &mut self.rng);
        self.agent = self.start_position();
        log::debug!("Environment reset, agent at {:?}", self.agent);
        self.observe()
    }
}
