// src/observer.rs
//
// Observer capability: raw frame -> fixed-length feature vector.
//
// The adapter core only consumes this interface; the concrete pixel
// pipeline is supplied by the caller. `DownsampleObserver` is the default
// implementation: strided grayscale downsampling into [0, 1] features.

use anyhow::{bail, Result};

use crate::types::Frame;

/// Converts raw frames into feature vectors for the agent.
///
/// Implementations must produce vectors of constant length for the
/// lifetime of the observer; a varying length is a contract violation,
/// not a recoverable condition.
pub trait Observer: Send {
    /// Encode one raw frame into a feature vector of length [`obs_len`](Self::obs_len).
    fn obs_vec(&self, frame: &Frame) -> Result<Vec<f64>>;

    /// Length of every vector produced by [`obs_vec`](Self::obs_vec).
    fn obs_len(&self) -> usize;
}

/// Strided grayscale downsampler.
///
/// Samples one pixel out of every `stride x stride` block (top-left of the
/// block) and emits its mean channel intensity normalized to [0, 1], row
/// by row. Expects frames of a fixed geometry declared at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownsampleObserver {
    width: usize,
    height: usize,
    stride: usize,
}

impl DownsampleObserver {
    /// Create an observer for `width x height` frames sampled at `stride`.
    pub fn new(width: usize, height: usize, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("frame geometry must be non-zero, got {}x{}", width, height);
        }
        if stride == 0 {
            bail!("stride must be at least 1");
        }
        Ok(Self {
            width,
            height,
            stride,
        })
    }

    fn cols(&self) -> usize {
        (self.width + self.stride - 1) / self.stride
    }

    fn rows(&self) -> usize {
        (self.height + self.stride - 1) / self.stride
    }
}

impl Observer for DownsampleObserver {
    fn obs_vec(&self, frame: &Frame) -> Result<Vec<f64>> {
        if frame.width != self.width || frame.height != self.height {
            bail!(
                "frame is {}x{}, observer expects {}x{}",
                frame.width,
                frame.height,
                self.width,
                self.height
            );
        }
        if frame.data.len() != self.width * self.height * 3 {
            bail!(
                "pixel buffer holds {} bytes, expected {}",
                frame.data.len(),
                self.width * self.height * 3
            );
        }

        let mut features = Vec::with_capacity(self.obs_len());
        for y in (0..self.height).step_by(self.stride) {
            for x in (0..self.width).step_by(self.stride) {
                let (r, g, b) = frame.rgb(x, y);
                features.push((r as f64 + g as f64 + b as f64) / (3.0 * 255.0));
            }
        }
        Ok(features)
    }

    fn obs_len(&self) -> usize {
        self.rows() * self.cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obs_len_matches_output() {
        let obs = DownsampleObserver::new(32, 24, 4).unwrap();
        let frame = Frame::filled(32, 24, 128);

        let v = obs.obs_vec(&frame).unwrap();
        assert_eq!(v.len(), obs.obs_len());
        assert_eq!(v.len(), 8 * 6);
    }

    #[test]
    fn test_uneven_geometry_rounds_up() {
        // 10x7 at stride 4 samples columns {0,4,8} and rows {0,4}.
        let obs = DownsampleObserver::new(10, 7, 4).unwrap();
        assert_eq!(obs.obs_len(), 3 * 2);
    }

    #[test]
    fn test_features_normalized() {
        let obs = DownsampleObserver::new(8, 8, 8).unwrap();

        let black = obs.obs_vec(&Frame::filled(8, 8, 0)).unwrap();
        let white = obs.obs_vec(&Frame::filled(8, 8, 255)).unwrap();

        assert_eq!(black, vec![0.0]);
        assert_eq!(white, vec![1.0]);
    }

    #[test]
    fn test_deterministic_encoding() {
        let obs = DownsampleObserver::new(16, 16, 2).unwrap();
        let mut frame = Frame::filled(16, 16, 30);
        frame.set_rgb(0, 0, (255, 0, 0));

        assert_eq!(obs.obs_vec(&frame).unwrap(), obs.obs_vec(&frame).unwrap());
    }

    #[test]
    fn test_geometry_mismatch_is_error() {
        let obs = DownsampleObserver::new(8, 8, 2).unwrap();
        let frame = Frame::filled(4, 4, 0);

        assert!(obs.obs_vec(&frame).is_err());
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(DownsampleObserver::new(8, 8, 0).is_err());
    }
}
