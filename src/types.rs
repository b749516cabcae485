// src/types.rs
//
// Common shared types for the pixelgym adapter.

use serde::{Deserialize, Serialize};

/// One raw observation: an RGB24 frame captured from the simulation.
///
/// Pixel data is row-major, three bytes per pixel, `width * height * 3`
/// bytes total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame from raw RGB24 bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width * height * 3,
            "pixel buffer length must be width * height * 3"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a frame with every channel of every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height * 3],
        }
    }

    /// Read the RGB triple at pixel `(x, y)`.
    pub fn rgb(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 3;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Write the RGB triple at pixel `(x, y)`.
    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: (u8, u8, u8)) {
        let i = (y * self.width + x) * 3;
        self.data[i] = rgb.0;
        self.data[i + 1] = rgb.1;
        self.data[i + 2] = rgb.2;
    }
}

/// A single simulator input event produced by an Actor.
///
/// Events are consumed by the raw environment on the step they were
/// produced and are never retained by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A key transitioned to pressed.
    KeyDown { code: String },
    /// A key transitioned to released.
    KeyUp { code: String },
    /// A pointer press at a fixed screen position.
    MouseDown { x: i32, y: i32 },
    /// A pointer release at a fixed screen position.
    MouseUp { x: i32, y: i32 },
}

impl InputEvent {
    /// Key code for key events, `None` for mouse events.
    pub fn key_code(&self) -> Option<&str> {
        match self {
            InputEvent::KeyDown { code } | InputEvent::KeyUp { code } => Some(code),
            _ => None,
        }
    }
}
