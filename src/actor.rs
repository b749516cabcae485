// src/actor.rs
//
// Actor capability: abstract action vector -> simulator input events.
//
// Actors are stateful across a single episode so they can emit only the
// press/release transitions the simulator needs, instead of re-sending
// the full held state every frame. The orchestrator resets them on every
// environment reset.

use crate::types::InputEvent;

/// Threshold above which an action component counts as "held".
const PRESS_THRESHOLD: f64 = 0.5;

/// Converts agent actions into simulator input events.
pub trait Actor: Send {
    /// Clear per-episode state (e.g. the held-key set).
    fn reset(&mut self);

    /// Convert one action vector into zero or more input events.
    fn events(&mut self, action: &[f64]) -> Vec<InputEvent>;
}

/// Maps one action component per key onto key press/release events.
///
/// A component above 0.5 means the key is held this step. Only edges are
/// emitted: `KeyDown` when a key becomes held, `KeyUp` when it is
/// released. Components beyond the key list are ignored; missing
/// components read as released.
#[derive(Debug, Clone)]
pub struct KeyActor {
    keys: Vec<String>,
    pressed: Vec<bool>,
}

impl KeyActor {
    pub fn new(keys: Vec<String>) -> Self {
        let pressed = vec![false; keys.len()];
        Self { keys, pressed }
    }

    /// Keys this actor controls, in action-component order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Actor for KeyActor {
    fn reset(&mut self) {
        for p in &mut self.pressed {
            *p = false;
        }
    }

    fn events(&mut self, action: &[f64]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for (i, key) in self.keys.iter().enumerate() {
            let want = action.get(i).copied().unwrap_or(0.0) > PRESS_THRESHOLD;
            let held = self.pressed[i];
            if held && !want {
                events.push(InputEvent::KeyUp { code: key.clone() });
            } else if want && !held {
                events.push(InputEvent::KeyDown { code: key.clone() });
            }
            self.pressed[i] = want;
        }
        events
    }
}

/// Maps a single action component onto pointer press/release at a fixed
/// screen position.
///
/// Emits `MouseDown` when the component crosses above the threshold and
/// `MouseUp` when it crosses back, nothing while the state is unchanged.
#[derive(Debug, Clone)]
pub struct TapActor {
    x: i32,
    y: i32,
    pressed: bool,
}

impl TapActor {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            pressed: false,
        }
    }
}

impl Actor for TapActor {
    fn reset(&mut self) {
        self.pressed = false;
    }

    fn events(&mut self, action: &[f64]) -> Vec<InputEvent> {
        let want = action.first().copied().unwrap_or(0.0) > PRESS_THRESHOLD;
        if want == self.pressed {
            return Vec::new();
        }
        self.pressed = want;
        if want {
            vec![InputEvent::MouseDown { x: self.x, y: self.y }]
        } else {
            vec![InputEvent::MouseUp { x: self.x, y: self.y }]
        }
    }
}
