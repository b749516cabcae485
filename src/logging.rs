// src/logging.rs
//
// Lifecycle event sinks for the adapter.
// - EnvSink:  trait called at every state-machine transition
// - NoopSink: discards all events
// - FileSink: writes one JSON line per event for offline inspection
//
// Sinks are incidental instrumentation: nothing in the environment
// contract depends on them.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::env::Stage;

/// One lifecycle event emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EnvEvent {
    /// A reset began.
    ResetStart,
    /// A reset completed; `obs_len` is the joined observation length.
    ResetDone { obs_len: usize },
    /// A step completed.
    Step { timestep: u64, reward: f64, done: bool },
    /// A stage failed.
    Error { stage: Stage, message: String },
}

/// Abstract sink for lifecycle events.
pub trait EnvSink: Send {
    fn record(&mut self, event: &EnvEvent);
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EnvSink for NoopSink {
    fn record(&mut self, _event: &EnvEvent) {
        // intentionally no-op
    }
}

/// JSONL file sink.
///
/// Each event is written as a single JSON object on its own line.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl EnvSink for FileSink {
    fn record(&mut self, event: &EnvEvent) {
        // A failing log write must never take down the environment, so
        // I/O errors are deliberately ignored.
        if let Ok(line) = serde_json::to_string(event) {
            let _ = self.writer.write_all(line.as_bytes());
            let _ = self.writer.write_all(b"\n");
            let _ = self.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = EnvEvent::Step {
            timestep: 3,
            reward: 0.5,
            done: false,
        };
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"event\":\"step\""));
        assert!(json.contains("\"timestep\":3"));

        let parsed: EnvEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_error_event_carries_stage() {
        let event = EnvEvent::Error {
            stage: Stage::Observe,
            message: "boom".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"stage\":\"observe\""));
    }
}
