//! pixelgym core library.
//!
//! This crate adapts a stateful external game simulation into the
//! standard RL environment contract: `reset() -> observation` and
//! `step(action) -> (observation, reward, done)`. The binary
//! (`src/bin/rollout.rs`) is just a thin smoke-rollout harness around
//! these components.
//!
//! # Architecture
//!
//! The codebase follows a clean separation between the orchestration core
//! and the capabilities it consumes:
//!
//! - **RawEnv** (`raw`): boundary trait for the underlying simulation:
//!   reset, observe one frame, advance one frame while injecting input
//!   events.
//!
//! - **Observer** (`observer`): raw frame → fixed-length feature vector.
//!   `DownsampleObserver` is the default strided-grayscale pipeline.
//!
//! - **Actor** (`actor`): abstract action vector → simulator input
//!   events, with per-episode edge-detection state (`KeyActor`,
//!   `TapActor`).
//!
//! - **FrameStack** (`frame_stack`): rolling window of the last H feature
//!   vectors; the agent observation is their concatenation, oldest first.
//!
//! - **GymEnv** (`env`): the episode orchestrator. Composes the pieces
//!   above, enforces max-steps truncation and reward scaling, and
//!   surfaces every collaborator failure as a stage-labelled error.
//!   `VecEnv` runs N independent instances for parallel rollouts.
//!
//! Lifecycle transitions are reported through an [`EnvSink`]
//! (`logging`), and `sim` ships two built-in raw environments: a
//! deterministic synthetic game and a scripted test double.

pub mod actor;
pub mod config;
pub mod env;
pub mod frame_stack;
pub mod logging;
pub mod observer;
pub mod raw;
pub mod rollout;
pub mod sim;
pub mod types;

// --- Re-exports for ergonomic external use ---------------------------------

pub use actor::{Actor, KeyActor, TapActor};
pub use config::{ConfigError, EnvConfig};
pub use env::{EnvError, GymEnv, Stage, StepError, StepInfo, StepResult, VecEnv};
pub use frame_stack::FrameStack;
pub use logging::{EnvEvent, EnvSink, FileSink, NoopSink};
pub use observer::{DownsampleObserver, Observer};
pub use raw::RawEnv;
pub use rollout::{run_episode, EpisodeSummary, RandomPolicy, TerminationReason};
pub use sim::{ScriptedSim, SyntheticGame};
pub use types::{Frame, InputEvent};
