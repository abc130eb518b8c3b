//! Tabular Q-learning agent
//!
//! Q-table is a dense `state_size × action_size` grid of zeros, row-major.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RlError;
use crate::settings::AgentSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QLearningAgent {
    state_size: usize,
    action_size: usize,
    q_table: Vec<f32>,
    pub learning_rate: f32,
    pub discount_factor: f32,
    pub epsilon: f32,
}

impl QLearningAgent {
    pub fn new(state_size: usize, action_size: usize, settings: &AgentSettings) -> Self {
        Self {
            state_size,
            action_size,
            q_table: vec![0.0; state_size * action_size],
            learning_rate: settings.learning_rate,
            discount_factor: settings.discount_factor,
            epsilon: settings.epsilon,
        }
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    fn check_state(&self, state: usize) -> Result<(), RlError> {
        if state < self.state_size {
            Ok(())
        } else {
            Err(RlError::StateOutOfRange {
                index: state,
                state_size: self.state_size,
            })
        }
    }

    fn check_action(&self, action: usize) -> Result<(), RlError> {
        if action < self.action_size {
            Ok(())
        } else {
            Err(RlError::ActionOutOfRange {
                index: action,
                action_size: self.action_size,
            })
        }
    }

    /// Estimated value of `action` in `state`; 0.0 for indices outside the table
    pub fn q_value(&self, state: usize, action: usize) -> f32 {
        if state >= self.state_size || action >= self.action_size {
            return 0.0;
        }
        self.q_table[state * self.action_size + action]
    }

    pub fn q_row(&self, state: usize) -> Result<&[f32], RlError> {
        self.check_state(state)?;
        let start = state * self.action_size;
        Ok(&self.q_table[start..start + self.action_size])
    }

    /// Argmax over actions; ties go to the lowest index
    pub fn greedy_action(&self, state: usize) -> Result<usize, RlError> {
        let row = self.q_row(state)?;
        let mut best = 0;
        for (a, &q) in row.iter().enumerate().skip(1) {
            if q > row[best] {
                best = a;
            }
        }
        Ok(best)
    }

    /// Epsilon-greedy: uniform random action with probability ε, else greedy
    pub fn choose_action<R: Rng>(&self, state: usize, rng: &mut R) -> Result<usize, RlError> {
        self.check_state(state)?;
        if rng.random::<f32>() < self.epsilon {
            Ok(rng.random_range(0..self.action_size))
        } else {
            self.greedy_action(state)
        }
    }

    /// Largest estimate in a row
    pub fn max_value(&self, state: usize) -> Result<f32, RlError> {
        Ok(self.q_row(state)?.iter().copied().fold(f32::NEG_INFINITY, f32::max))
    }

    /// One-step Q-learning update; returns the TD error
    pub fn learn(&mut self, state: usize, action: usize, reward: f32, next_state: usize) -> Result<f32, RlError> {
        self.check_state(state)?;
        self.check_action(action)?;
        let td_target = reward + self.discount_factor * self.max_value(next_state)?;
        let slot = &mut self.q_table[state * self.action_size + action];
        let td_error = td_target - *slot;
        *slot += self.learning_rate * td_error;
        Ok(td_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RngState;

    fn agent(epsilon: f32) -> QLearningAgent {
        QLearningAgent::new(
            16,
            7,
            &AgentSettings {
                learning_rate: 0.1,
                discount_factor: 0.52,
                epsilon,
            },
        )
    }

    #[test]
    fn test_learn_fixture() {
        let mut a = agent(0.0);
        let err = a.learn(3, 2, 0.3, 5).unwrap();
        assert!((err - 0.3).abs() < 1e-6);
        assert!((a.q_value(3, 2) - 0.03).abs() < 1e-6);
        // Everything else untouched
        assert_eq!(a.q_value(3, 1), 0.0);
        assert_eq!(a.q_value(5, 2), 0.0);
    }

    #[test]
    fn test_learn_bootstraps_from_next_state() {
        let mut a = agent(0.0);
        a.learn(5, 4, 1.0, 5).unwrap(); // Q(5,4) = 0.1
        let q54 = a.q_value(5, 4);
        a.learn(3, 0, 0.0, 5).unwrap();
        let expected = 0.1 * (0.52 * q54);
        assert!((a.q_value(3, 0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_learn_exact_formula_with_nonzero_prior() {
        let mut a = agent(0.0);
        a.learn(1, 1, 0.5, 2).unwrap();
        let pre = a.q_value(1, 1);
        a.learn(2, 6, -0.2, 0).unwrap();
        let next_max = a.max_value(2).unwrap();
        a.learn(1, 1, 0.25, 2).unwrap();
        let expected = pre + 0.1 * (0.25 + 0.52 * next_max - pre);
        assert!((a.q_value(1, 1) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_greedy_ties_lowest_index() {
        let a = agent(0.0);
        assert_eq!(a.greedy_action(0).unwrap(), 0);

        let mut a = agent(0.0);
        a.learn(0, 4, 1.0, 1).unwrap();
        a.learn(0, 2, 1.0, 1).unwrap();
        assert_eq!(a.greedy_action(0).unwrap(), 2);
    }

    #[test]
    fn test_epsilon_zero_is_greedy() {
        let mut a = agent(0.0);
        a.learn(7, 5, 2.0, 8).unwrap();
        let mut rng = RngState::new(1).to_rng();
        for _ in 0..200 {
            assert_eq!(a.choose_action(7, &mut rng).unwrap(), 5);
        }
    }

    #[test]
    fn test_epsilon_one_is_uniform() {
        let mut a = agent(1.0);
        a.learn(0, 3, 5.0, 1).unwrap();
        let mut rng = RngState::new(2).to_rng();
        let draws = 70_000;
        let mut counts = [0usize; 7];
        for _ in 0..draws {
            counts[a.choose_action(0, &mut rng).unwrap()] += 1;
        }
        let expected = draws as f64 / 7.0;
        // Chi-squared with 6 dof; 22.46 is the 0.999 quantile
        let chi2: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi2 < 22.46, "counts {counts:?}, chi2 {chi2}");
    }

    #[test]
    fn test_out_of_range_indices() {
        let mut a = agent(0.0);
        assert_eq!(
            a.learn(16, 0, 1.0, 0),
            Err(RlError::StateOutOfRange {
                index: 16,
                state_size: 16
            })
        );
        assert!(a.learn(0, 7, 1.0, 0).is_err());
        assert!(a.learn(0, 0, 1.0, 99).is_err());
        assert!(a.choose_action(16, &mut RngState::new(3).to_rng()).is_err());
        assert_eq!(a.q_value(100, 100), 0.0);
    }
}
