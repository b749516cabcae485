// src/raw.rs
//
// Boundary to the underlying simulation.
//
// The adapter treats the simulation as an opaque capability: it can be
// reset, observed, and advanced by one frame at a time while input events
// are injected. Implementations live with the caller (or in `sim` for the
// built-in ones); the adapter never assumes anything about what is behind
// this trait.

use std::time::Duration;

use anyhow::Result;

use crate::types::{Frame, InputEvent};

/// The raw environment contract consumed by the orchestrator.
///
/// Calls are synchronous and blocking; no timeout or cancellation is
/// applied at this layer. Every method may fail, and the orchestrator
/// surfaces the first failure without retrying.
pub trait RawEnv: Send {
    /// Put the simulation back into its initial state.
    fn reset(&mut self) -> Result<()>;

    /// Capture the current raw observation.
    fn observe(&mut self) -> Result<Frame>;

    /// Advance simulated time by exactly `frame_time` while injecting
    /// `events`.
    ///
    /// Returns the incremental reward since the previous step and the
    /// simulation's own episode-termination flag.
    fn step(&mut self, frame_time: Duration, events: &[InputEvent]) -> Result<(f64, bool)>;
}
