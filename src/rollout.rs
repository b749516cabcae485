// src/rollout.rs
//
// Episode runner: drive one full reset/step lifecycle against an
// environment and summarize the outcome. Used by the rollout binary and
// the integration tests; training loops are expected to bring their own
// loop and use GymEnv directly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::env::GymEnv;

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The raw simulation reported done.
    NaturalDone,
    /// The step limit forced termination.
    Truncated,
    /// A reset or step failed.
    Failed,
}

/// Summary of a completed episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode_id: u64,
    /// Steps completed before termination.
    pub steps: u64,
    /// Sum of (scaled) rewards, including any reward carried by a failed
    /// step whose raw frame completed.
    pub total_reward: f64,
    pub termination: TerminationReason,
    /// Error message when `termination` is `Failed`.
    pub error: Option<String>,
}

/// Run one episode to termination.
///
/// Resets the environment, then repeatedly asks `policy` for an action
/// and steps until the episode ends (naturally, by truncation, or with an
/// error).
pub fn run_episode<F>(env: &mut GymEnv, episode_id: u64, mut policy: F) -> EpisodeSummary
where
    F: FnMut(&[f64]) -> Vec<f64>,
{
    let mut summary = EpisodeSummary {
        episode_id,
        steps: 0,
        total_reward: 0.0,
        termination: TerminationReason::NaturalDone,
        error: None,
    };

    let mut obs = match env.reset() {
        Ok(obs) => obs,
        Err(err) => {
            summary.termination = TerminationReason::Failed;
            summary.error = Some(err.to_string());
            return summary;
        }
    };

    loop {
        let action = policy(&obs);
        match env.step(&action) {
            Ok(result) => {
                summary.steps += 1;
                summary.total_reward += result.reward;
                if result.done {
                    summary.termination = if result.info.truncated {
                        TerminationReason::Truncated
                    } else {
                        TerminationReason::NaturalDone
                    };
                    return summary;
                }
                obs = result.observation;
            }
            Err(err) => {
                // A completed raw step still counts toward the total even
                // when its observation failed.
                if let Some(reward) = err.reward {
                    summary.total_reward += reward;
                }
                summary.termination = TerminationReason::Failed;
                summary.error = Some(err.to_string());
                return summary;
            }
        }
    }
}

/// Seeded uniform random action source for smoke rollouts.
pub struct RandomPolicy {
    rng: ChaCha8Rng,
    action_dim: usize,
}

impl RandomPolicy {
    pub fn new(seed: u64, action_dim: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            action_dim,
        }
    }

    /// Sample an action in [0, 1) per component, ignoring the observation.
    pub fn act(&mut self, _obs: &[f64]) -> Vec<f64> {
        (0..self.action_dim)
            .map(|_| self.rng.gen_range(0.0..1.0))
            .collect()
    }
}
