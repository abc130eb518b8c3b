//! Best-episode leaderboard
//!
//! Tracks the top 10 training episodes by total reward.

use serde::{Deserialize, Serialize};

/// Maximum number of episodes to keep
pub const MAX_BEST_EPISODES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestEpisode {
    pub total_reward: f32,
    pub episode: u32,
    pub steps: u32,
}

/// Episodes sorted by descending total reward
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestEpisodes {
    pub entries: Vec<BestEpisode>,
}

impl BestEpisodes {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a total reward earns a place
    pub fn qualifies(&self, total_reward: f32) -> bool {
        if !total_reward.is_finite() {
            return false;
        }
        if self.entries.len() < MAX_BEST_EPISODES {
            return true;
        }
        self.entries
            .last()
            .map(|e| total_reward > e.total_reward)
            .unwrap_or(true)
    }

    /// Rank a total reward would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, total_reward: f32) -> Option<usize> {
        if !self.qualifies(total_reward) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| total_reward > e.total_reward);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an episode if it qualifies; returns the rank achieved
    pub fn record(&mut self, total_reward: f32, episode: u32, steps: u32) -> Option<usize> {
        let rank = self.potential_rank(total_reward)?;
        self.entries.insert(
            rank - 1,
            BestEpisode {
                total_reward,
                episode,
                steps,
            },
        );
        self.entries.truncate(MAX_BEST_EPISODES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest total reward (if any)
    pub fn top(&self) -> Option<&BestEpisode> {
        self.entries.first()
    }
}
