//! Episode loop
//!
//! Runs a fixed number of episodes, each ending after `max_steps` steps (or
//! earlier if the environment ever reports `done`).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::QLearningAgent;
use super::best::BestEpisodes;
use super::encoding::{StateEncoder, StateIndex};
use super::env::{Action, QuantumEnv};
use crate::error::{ConfigError, TrainError};
use crate::settings::Settings;

/// Per-episode outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub total_reward: f32,
    pub steps: u32,
}

/// Outcome of a training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episodes: Vec<EpisodeSummary>,
    pub best: BestEpisodes,
}

impl TrainingReport {
    /// Mean total reward over all episodes (0.0 if none ran)
    pub fn mean_reward(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.total_reward).sum::<f32>() / self.episodes.len() as f32
    }

    pub fn total_steps(&self) -> u64 {
        self.episodes.iter().map(|e| e.steps as u64).sum()
    }
}

/// Fluctuate the world every `every` steps (0 = never). When it fires, the
/// agent's view has changed, so the fresh state is returned.
pub fn fluctuate_if_due(env: &mut QuantumEnv, encoder: &StateEncoder, steps: u32, every: u32) -> Option<StateIndex> {
    if every == 0 || steps % every != 0 {
        return None;
    }
    env.fluctuate();
    Some(encoder.encode(&env.observe()))
}

/// Run a single episode from reset to the step limit
pub fn run_episode<R: Rng>(
    env: &mut QuantumEnv,
    agent: &mut QLearningAgent,
    encoder: &StateEncoder,
    settings: &Settings,
    episode: u32,
    rng: &mut R,
) -> Result<EpisodeSummary, TrainError> {
    let training = &settings.training;
    let mut state = encoder.encode(&env.reset());
    let mut total_reward = 0.0;
    let mut steps = 0;

    while steps < training.max_steps {
        let action = agent.choose_action(state.get(), rng)?;
        let result = env.step_index(action)?;
        let next_state = encoder.encode(&result.observation);
        agent.learn(state.get(), action, result.reward, next_state.get())?;

        total_reward += result.reward;
        steps += 1;
        state = fluctuate_if_due(env, encoder, steps, training.fluctuate_every).unwrap_or(next_state);

        if result.done {
            break;
        }
    }

    Ok(EpisodeSummary {
        episode,
        total_reward,
        steps,
    })
}

/// Train `agent` on `env` for the configured number of episodes
pub fn train<R: Rng>(
    env: &mut QuantumEnv,
    agent: &mut QLearningAgent,
    encoder: &StateEncoder,
    settings: &Settings,
    rng: &mut R,
) -> Result<TrainingReport, TrainError> {
    settings.validate()?;
    if encoder.state_size() != agent.state_size() {
        return Err(ConfigError::StateSizeMismatch {
            encoder: encoder.state_size(),
            agent: agent.state_size(),
        }
        .into());
    }
    if agent.action_size() != Action::COUNT {
        return Err(ConfigError::ActionSizeMismatch {
            env: Action::COUNT,
            agent: agent.action_size(),
        }
        .into());
    }

    let training = &settings.training;
    let mut report = TrainingReport::default();

    for episode in 0..training.episodes {
        let summary = run_episode(env, agent, encoder, settings, episode, rng)?;

        if let Some(rank) = report.best.record(summary.total_reward, episode, summary.steps) {
            log::debug!("Episode {} ranked #{} ({:.3})", episode, rank, summary.total_reward);
        }
        if training.log_interval > 0 && episode % training.log_interval == 0 {
            log::info!("Episode: {}, Total Reward: {:.3}", episode, summary.total_reward);
        }
        report.episodes.push(summary);
    }

    log::info!(
        "Trained {} episodes ({} steps), mean reward {:.3}",
        report.episodes.len(),
        report.total_steps(),
        report.mean_reward()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TrainingPreset;
    use crate::sim::GridPos;

    fn setup(settings: &Settings) -> (QuantumEnv, QLearningAgent, StateEncoder) {
        let rng = settings.rng_state();
        let env = QuantumEnv::new(settings.world.clone(), rng);
        let agent = QLearningAgent::new(settings.training.state_size, Action::COUNT, &settings.agent);
        let encoder = StateEncoder::new(settings.training.state_size, settings.training.encoder_levels).unwrap();
        (env, agent, encoder)
    }

    #[test]
    fn test_runs_exact_episode_and_step_counts() {
        let mut settings = Settings::from_preset(TrainingPreset::Smoke);
        settings.training.episodes = 5;
        settings.training.max_steps = 17;
        let (mut env, mut agent, encoder) = setup(&settings);
        let mut rng = settings.rng_state().with_stream(1).to_rng();

        let report = train(&mut env, &mut agent, &encoder, &settings, &mut rng).unwrap();
        assert_eq!(report.episodes.len(), 5);
        assert!(report.episodes.iter().all(|e| e.steps == 17));
        assert_eq!(report.total_steps(), 85);
        assert_eq!(report.best.entries.len(), 5);
    }

    #[test]
    fn test_zero_episodes_fails_fast() {
        let mut settings = Settings::default();
        settings.training.episodes = 0;
        let (mut env, mut agent, encoder) = setup(&settings);
        let mut rng = settings.rng_state().to_rng();
        let result = train(&mut env, &mut agent, &encoder, &settings, &mut rng);
        assert!(matches!(result, Err(TrainError::Config(ConfigError::NoEpisodes))));
    }

    #[test]
    fn test_state_size_mismatch_rejected() {
        let settings = Settings::from_preset(TrainingPreset::Smoke);
        let (mut env, mut agent, _) = setup(&settings);
        let encoder = StateEncoder::new(32, 4).unwrap();
        let mut rng = settings.rng_state().to_rng();
        let result = train(&mut env, &mut agent, &encoder, &settings, &mut rng);
        assert!(matches!(
            result,
            Err(TrainError::Config(ConfigError::StateSizeMismatch { encoder: 32, agent: 16 }))
        ));
    }

    #[test]
    fn test_action_size_mismatch_rejected() {
        let settings = Settings::from_preset(TrainingPreset::Smoke);
        let (mut env, _, encoder) = setup(&settings);
        let mut agent = QLearningAgent::new(settings.training.state_size, 4, &settings.agent);
        let mut rng = settings.rng_state().to_rng();
        let result = train(&mut env, &mut agent, &encoder, &settings, &mut rng);
        assert!(matches!(
            result,
            Err(TrainError::Config(ConfigError::ActionSizeMismatch { env: 7, agent: 4 }))
        ));
    }

    #[test]
    fn test_fluctuation_refreshes_state() {
        let mut settings = Settings::from_preset(TrainingPreset::Smoke);
        settings.world.neighborhood = 4;
        settings.world.fluctuation_probability = 1.0;
        settings.world.fluctuation_delta = 1.0;
        let (mut env, _, encoder) = setup(&settings);
        env.set_agent_position(GridPos::ORIGIN);

        // Not due yet: world untouched
        assert_eq!(fluctuate_if_due(&mut env, &encoder, 1, 2), None);
        assert_eq!(fluctuate_if_due(&mut env, &encoder, 4, 0), None);
        assert_eq!(env.world().ticks, 0);

        let before = env.observe();
        let fresh = fluctuate_if_due(&mut env, &encoder, 2, 2);
        assert_eq!(env.world().ticks, 1);
        let after = env.observe();
        assert_ne!(before, after);
        assert_eq!(fresh, Some(encoder.encode(&after)));
    }

    #[test]
    fn test_rewards_bounded_per_step() {
        let settings = Settings::from_preset(TrainingPreset::Smoke);
        let (mut env, mut agent, encoder) = setup(&settings);
        let mut rng = settings.rng_state().with_stream(2).to_rng();
        let report = train(&mut env, &mut agent, &encoder, &settings, &mut rng).unwrap();
        let max_steps = settings.training.max_steps as f32;
        for e in &report.episodes {
            assert!(e.total_reward >= -0.5 * max_steps - 1e-3);
            assert!(e.total_reward <= 0.5 * max_steps + 1e-3);
        }
    }

    #[test]
    fn test_training_is_reproducible() {
        let mut settings = Settings::from_preset(TrainingPreset::Smoke);
        settings.training.fluctuate_every = 3;
        let run = || {
            let (mut env, mut agent, encoder) = setup(&settings);
            let mut rng = settings.rng_state().with_stream(1).to_rng();
            let report = train(&mut env, &mut agent, &encoder, &settings, &mut rng).unwrap();
            (report.episodes, agent.q_row(0).unwrap().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_learning_touches_q_table() {
        let settings = Settings::from_preset(TrainingPreset::Smoke);
        let (mut env, mut agent, encoder) = setup(&settings);
        let mut rng = settings.rng_state().with_stream(1).to_rng();
        train(&mut env, &mut agent, &encoder, &settings, &mut rng).unwrap();
        // Every step at an empty cell pays -0.5, so some estimate must have moved
        let moved = (0..agent.state_size())
            .flat_map(|s| (0..agent.action_size()).map(move |a| (s, a)))
            .any(|(s, a)| agent.q_value(s, a) != 0.0);
        assert!(moved);
    }
}
