// src/env.rs
//
// Gym-style episode orchestrator.
//
// GymEnv composes the raw simulation, an Actor, an Observer, and a
// FrameStack into the standard RL environment contract:
// - reset() -> observation
// - step(action) -> (observation, reward, done)
//
// The orchestrator enforces max-steps truncation and reward scaling, and
// translates failures from any collaborator into a uniform stage-labelled
// error. It never retries and never swallows an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::config::{ConfigError, EnvConfig};
use crate::frame_stack::FrameStack;
use crate::logging::{EnvEvent, EnvSink, NoopSink};
use crate::observer::Observer;
use crate::raw::RawEnv;

/// Pipeline stage labels attached to adapter errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Reset,
    Observe,
    Step,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Reset => "reset",
            Stage::Observe => "observe",
            Stage::Step => "step",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the environment adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvError {
    /// The underlying simulation failed.
    Raw { stage: Stage, message: String },
    /// A raw observation could not be encoded into a feature vector.
    Encode { stage: Stage, message: String },
    /// `step` was called before the first successful `reset`.
    ResetRequired,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::Raw { stage, message } => {
                write!(f, "{}: raw environment: {}", stage, message)
            }
            EnvError::Encode { stage, message } => {
                write!(f, "{}: observation encoding: {}", stage, message)
            }
            EnvError::ResetRequired => write!(f, "step called before a successful reset"),
        }
    }
}

impl std::error::Error for EnvError {}

/// A failed `step`, preserving whatever the raw simulation already
/// produced before the failure.
///
/// When the raw step completed but the follow-up observation failed,
/// `reward` and `done` carry the outcome of the frame that was actually
/// simulated; the history window is left untouched in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct StepError {
    pub error: EnvError,
    /// Scaled reward from the raw step, when it completed.
    pub reward: Option<f64>,
    /// Natural done flag from the raw step, when it completed.
    pub done: Option<bool>,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<EnvError> for StepError {
    fn from(error: EnvError) -> Self {
        Self {
            error,
            reward: None,
            done: None,
        }
    }
}

/// Result of a single successful environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Joined observation after taking the action.
    pub observation: Vec<f64>,
    /// Reward for this step, scaled if a reward scale is configured.
    pub reward: f64,
    /// Whether the episode has terminated (naturally or by truncation).
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

/// Additional information returned from a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Timestep index after this step (1 on the first step of an episode).
    pub timestep: u64,
    /// Done as reported by the raw simulation itself.
    pub natural_done: bool,
    /// True when the step limit forced termination this step.
    pub truncated: bool,
}

/// Gym-style environment over a raw game simulation.
///
/// Drives one reset/step lifecycle at a time. Not safe for concurrent
/// invocation on the same instance; run parallel rollouts on independent
/// instances (see [`VecEnv`]).
pub struct GymEnv {
    raw: Box<dyn RawEnv>,
    actor: Box<dyn Actor>,
    observer: Box<dyn Observer>,
    config: EnvConfig,
    stack: FrameStack,
    sink: Box<dyn EnvSink>,
    /// Timestep index within the current episode.
    timestep: u64,
    /// False before the first successful reset and after a failed one.
    active: bool,
}

impl GymEnv {
    /// Create an environment from its collaborators.
    ///
    /// Fails fast on invalid configuration; no episode can begin with a
    /// bad config.
    pub fn new(
        raw: Box<dyn RawEnv>,
        actor: Box<dyn Actor>,
        observer: Box<dyn Observer>,
        config: EnvConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let stack = FrameStack::new(config.history_size);
        Ok(Self {
            raw,
            actor,
            observer,
            config,
            stack,
            sink: Box::new(NoopSink),
            timestep: 0,
            active: false,
        })
    }

    /// Attach a lifecycle event sink.
    pub fn with_sink(mut self, sink: Box<dyn EnvSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Timestep index within the current episode.
    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    /// Whether a successful reset has made the environment steppable.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Length of the joined observation produced by `reset` and `step`.
    pub fn observation_len(&self) -> usize {
        self.observer.obs_len() * self.config.history_size
    }

    /// Start a new episode and return the initial joined observation.
    ///
    /// Resets the actor, the timestep counter, the raw simulation, and the
    /// history window, in that order. The first failure aborts the reset;
    /// the environment then requires another `reset` before stepping.
    pub fn reset(&mut self) -> Result<Vec<f64>, EnvError> {
        self.sink.record(&EnvEvent::ResetStart);
        self.active = false;
        self.actor.reset();
        self.timestep = 0;

        if let Err(err) = self.raw.reset() {
            return Err(self.report(EnvError::Raw {
                stage: Stage::Reset,
                message: err.to_string(),
            }));
        }
        let frame = match self.raw.observe() {
            Ok(frame) => frame,
            Err(err) => {
                return Err(self.report(EnvError::Raw {
                    stage: Stage::Reset,
                    message: err.to_string(),
                }))
            }
        };
        let obs_vec = match self.observer.obs_vec(&frame) {
            Ok(v) => v,
            Err(err) => {
                return Err(self.report(EnvError::Encode {
                    stage: Stage::Reset,
                    message: err.to_string(),
                }))
            }
        };

        self.stack.reset(&obs_vec);
        let observation = self.stack.step(&obs_vec);
        self.active = true;

        self.sink.record(&EnvEvent::ResetDone {
            obs_len: observation.len(),
        });
        Ok(observation)
    }

    /// Take one step in the environment.
    ///
    /// Pipeline: actor events -> raw step -> reward scaling -> observe ->
    /// encode -> history window -> truncation check. The history window is
    /// only touched after a successful encode, so a mid-step failure
    /// leaves it exactly as it was before the call.
    ///
    /// A raw-environment failure ends the episode: further `step` calls
    /// return [`EnvError::ResetRequired`] until the next `reset`. An
    /// encoding failure leaves the environment steppable with its state
    /// unchanged.
    pub fn step(&mut self, action: &[f64]) -> Result<StepResult, StepError> {
        if !self.active {
            return Err(StepError::from(EnvError::ResetRequired));
        }

        let events = self.actor.events(action);
        let (raw_reward, natural_done) = match self.raw.step(self.config.frame_time, &events) {
            Ok(out) => out,
            Err(err) => {
                // A raw-environment failure is fatal for the episode: the
                // simulation is in an unknown state until the next reset.
                self.active = false;
                let error = EnvError::Raw {
                    stage: Stage::Step,
                    message: err.to_string(),
                };
                return Err(StepError::from(self.report(error)));
            }
        };

        // A scale of exactly zero means "leave the reward unmodified".
        let reward = if self.config.reward_scale != 0.0 {
            raw_reward * self.config.reward_scale
        } else {
            raw_reward
        };

        let frame = match self.raw.observe() {
            Ok(frame) => frame,
            Err(err) => {
                self.active = false;
                let error = EnvError::Raw {
                    stage: Stage::Observe,
                    message: err.to_string(),
                };
                return Err(StepError {
                    error: self.report(error),
                    reward: Some(reward),
                    done: Some(natural_done),
                });
            }
        };
        // An encoding failure leaves the orchestrator consistent: the
        // history window and timestep are untouched, and the environment
        // stays steppable.
        let obs_vec = match self.observer.obs_vec(&frame) {
            Ok(v) => v,
            Err(err) => {
                let error = EnvError::Encode {
                    stage: Stage::Observe,
                    message: err.to_string(),
                };
                return Err(StepError {
                    error: self.report(error),
                    reward: Some(reward),
                    done: Some(natural_done),
                });
            }
        };

        let observation = self.stack.step(&obs_vec);

        self.timestep += 1;
        let truncated = self.timestep >= self.config.max_steps;
        // Truncation overrides, never downgrades, a natural done.
        let done = natural_done || truncated;

        self.sink.record(&EnvEvent::Step {
            timestep: self.timestep,
            reward,
            done,
        });

        Ok(StepResult {
            observation,
            reward,
            done,
            info: StepInfo {
                timestep: self.timestep,
                natural_done,
                truncated,
            },
        })
    }

    /// Record an error event and hand the error back for propagation.
    fn report(&mut self, error: EnvError) -> EnvError {
        if let EnvError::Raw { stage, message } | EnvError::Encode { stage, message } = &error {
            self.sink.record(&EnvEvent::Error {
                stage: *stage,
                message: message.clone(),
            });
        }
        error
    }
}

/// N independent environments stepped sequentially.
///
/// Each environment owns its own raw simulation, actor, observer, and
/// history window; there is no shared mutable state between them.
pub struct VecEnv {
    envs: Vec<GymEnv>,
}

impl VecEnv {
    pub fn new(envs: Vec<GymEnv>) -> Self {
        Self { envs }
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Reset every environment, returning per-environment results.
    pub fn reset_all(&mut self) -> Vec<Result<Vec<f64>, EnvError>> {
        self.envs.iter_mut().map(|env| env.reset()).collect()
    }

    /// Step every environment with its own action.
    ///
    /// `actions` must have the same length as the number of environments.
    pub fn step(&mut self, actions: &[Vec<f64>]) -> Vec<Result<StepResult, StepError>> {
        assert_eq!(
            actions.len(),
            self.envs.len(),
            "actions length must match number of environments"
        );
        self.envs
            .iter_mut()
            .zip(actions.iter())
            .map(|(env, action)| env.step(action))
            .collect()
    }

    pub fn envs(&self) -> &[GymEnv] {
        &self.envs
    }
}
