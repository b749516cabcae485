// src/config.rs
//
// Static configuration for the environment adapter.
//
// Everything here is fixed at construction time. Validation happens once,
// before any episode begins; a bad value is a hard construction failure,
// never a runtime condition.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`GymEnv`](crate::env::GymEnv) instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Number of feature vectors stacked into the agent observation.
    ///
    /// Must be at least 1. A value of 1 disables history stacking and
    /// passes single-step observations through unchanged.
    pub history_size: usize,
    /// Hard cap on steps per episode. Reaching it forces `done = true`
    /// regardless of what the raw simulation reports.
    pub max_steps: u64,
    /// Multiplicative reward scale.
    ///
    /// A value of exactly `0.0` means "leave rewards unmodified"; it
    /// never zeroes the reward. Any other finite value multiplies every
    /// raw reward, including negative and zero rewards.
    pub reward_scale: f64,
    /// Simulated time advanced by the raw environment on each step.
    pub frame_time: Duration,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            history_size: 4,
            max_steps: 3000,
            reward_scale: 0.0,
            frame_time: Duration::from_millis(100),
        }
    }
}

impl EnvConfig {
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_reward_scale(mut self, reward_scale: f64) -> Self {
        self.reward_scale = reward_scale;
        self
    }

    pub fn with_frame_time(mut self, frame_time: Duration) -> Self {
        self.frame_time = frame_time;
        self
    }

    /// Check that the configuration describes a usable environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_size < 1 {
            return Err(ConfigError::HistorySize {
                got: self.history_size,
            });
        }
        if self.max_steps < 1 {
            return Err(ConfigError::MaxSteps { got: self.max_steps });
        }
        if !self.reward_scale.is_finite() {
            return Err(ConfigError::RewardScale {
                got: self.reward_scale,
            });
        }
        if self.frame_time.is_zero() {
            return Err(ConfigError::FrameTime);
        }
        Ok(())
    }
}

/// Invalid static configuration, detected at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigError {
    HistorySize { got: usize },
    MaxSteps { got: u64 },
    RewardScale { got: f64 },
    FrameTime,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HistorySize { got } => {
                write!(f, "history size must be at least 1, got {}", got)
            }
            ConfigError::MaxSteps { got } => {
                write!(f, "max steps must be at least 1, got {}", got)
            }
            ConfigError::RewardScale { got } => {
                write!(f, "reward scale must be finite, got {}", got)
            }
            ConfigError::FrameTime => write!(f, "frame time must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}
