// src/sim.rs
//
// Built-in raw environments.
//
// - SyntheticGame: a small deterministic catch-the-pellet game, so the
//   adapter can be exercised end-to-end without an external simulator.
// - ScriptedSim: scripted step outcomes plus failure injection, used as
//   the test double throughout the crate.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::raw::RawEnv;
use crate::types::{Frame, InputEvent};

/// Number of missed pellets that ends a [`SyntheticGame`] episode.
const MISS_LIMIT: u32 = 3;

/// A deterministic catch-the-pellet game.
///
/// Pellets fall one pixel per frame from the top of the screen; the agent
/// moves a paddle along the bottom row with `ArrowLeft` / `ArrowRight`
/// key events. Catching a pellet rewards +1.0, missing one costs -0.2,
/// and the episode ends naturally after three misses. All pellet spawns
/// come from a seeded RNG, so a fixed seed and action sequence reproduce
/// the same episode exactly.
pub struct SyntheticGame {
    seed: u64,
    rng: ChaCha8Rng,
    paddle_x: i32,
    pellet_x: i32,
    pellet_y: i32,
    held_left: bool,
    held_right: bool,
    caught: u32,
    missed: u32,
    elapsed: Duration,
}

impl SyntheticGame {
    pub const WIDTH: usize = 32;
    pub const HEIGHT: usize = 24;

    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            paddle_x: 0,
            pellet_x: 0,
            pellet_y: 0,
            held_left: false,
            held_right: false,
            caught: 0,
            missed: 0,
            elapsed: Duration::ZERO,
        };
        game.reset_state();
        game
    }

    pub fn caught(&self) -> u32 {
        self.caught
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    /// Simulated time advanced since the last reset.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn reset_state(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.paddle_x = (Self::WIDTH / 2) as i32;
        self.held_left = false;
        self.held_right = false;
        self.caught = 0;
        self.missed = 0;
        self.elapsed = Duration::ZERO;
        self.spawn_pellet();
    }

    fn spawn_pellet(&mut self) {
        self.pellet_x = self.rng.gen_range(0..Self::WIDTH as i32);
        self.pellet_y = 0;
    }

    fn apply_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match event {
                InputEvent::KeyDown { code } if code == "ArrowLeft" => self.held_left = true,
                InputEvent::KeyUp { code } if code == "ArrowLeft" => self.held_left = false,
                InputEvent::KeyDown { code } if code == "ArrowRight" => self.held_right = true,
                InputEvent::KeyUp { code } if code == "ArrowRight" => self.held_right = false,
                _ => {}
            }
        }
    }
}

impl RawEnv for SyntheticGame {
    fn reset(&mut self) -> Result<()> {
        self.reset_state();
        Ok(())
    }

    fn observe(&mut self) -> Result<Frame> {
        let mut frame = Frame::filled(Self::WIDTH, Self::HEIGHT, 0);

        // Paddle: three red pixels on the bottom row.
        let bottom = Self::HEIGHT - 1;
        for dx in -1..=1 {
            let x = self.paddle_x + dx;
            if (0..Self::WIDTH as i32).contains(&x) {
                frame.set_rgb(x as usize, bottom, (200, 40, 40));
            }
        }

        // Pellet: one white pixel.
        if (0..Self::HEIGHT as i32).contains(&self.pellet_y) {
            frame.set_rgb(self.pellet_x as usize, self.pellet_y as usize, (255, 255, 255));
        }

        Ok(frame)
    }

    fn step(&mut self, frame_time: Duration, events: &[InputEvent]) -> Result<(f64, bool)> {
        self.apply_events(events);

        let dir = (self.held_right as i32) - (self.held_left as i32);
        self.paddle_x = (self.paddle_x + dir).clamp(1, Self::WIDTH as i32 - 2);

        self.pellet_y += 1;
        let mut reward = 0.0;
        if self.pellet_y >= Self::HEIGHT as i32 - 1 {
            if (self.pellet_x - self.paddle_x).abs() <= 1 {
                reward = 1.0;
                self.caught += 1;
            } else {
                reward = -0.2;
                self.missed += 1;
            }
            self.spawn_pellet();
        }

        self.elapsed += frame_time;
        Ok((reward, self.missed >= MISS_LIMIT))
    }
}

/// Scripted raw environment for tests.
///
/// Pops one `(reward, done)` outcome per step (defaulting to `(0.0,
/// false)` once the script runs dry), records every event it receives,
/// and stamps each observed frame with the current step count so
/// downstream observations differ between steps. Failures can be injected
/// one-shot into reset, observe, or step.
pub struct ScriptedSim {
    outcomes: VecDeque<(f64, bool)>,
    events_seen: Vec<InputEvent>,
    /// Steps taken since the last reset.
    steps: u32,
    resets: u32,
    fail_reset: bool,
    fail_observe_at: Option<u32>,
    fail_step_at: Option<u32>,
}

impl ScriptedSim {
    pub const WIDTH: usize = 8;
    pub const HEIGHT: usize = 8;

    /// Gray value stamped into the frame observed after `steps` steps.
    const STAMP_STEP: u32 = 10;

    pub fn new(outcomes: Vec<(f64, bool)>) -> Self {
        Self {
            outcomes: outcomes.into(),
            events_seen: Vec::new(),
            steps: 0,
            resets: 0,
            fail_reset: false,
            fail_observe_at: None,
            fail_step_at: None,
        }
    }

    /// Make the next `reset` call fail (one-shot).
    pub fn fail_next_reset(&mut self) {
        self.fail_reset = true;
    }

    /// Make the `observe` call that follows step number `n` fail
    /// (one-shot). `n = 0` fails the reset-time observation.
    pub fn fail_observe_at(&mut self, n: u32) {
        self.fail_observe_at = Some(n);
    }

    /// Make step call number `n` (1-based) fail (one-shot).
    pub fn fail_step_at(&mut self, n: u32) {
        self.fail_step_at = Some(n);
    }

    /// Every input event received across all steps.
    pub fn events_seen(&self) -> &[InputEvent] {
        &self.events_seen
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Feature value an observer sees for the frame after `steps` steps,
    /// assuming whole-frame grayscale averaging.
    pub fn expected_gray(steps: u32) -> f64 {
        let v = (steps * Self::STAMP_STEP) as u8 as f64;
        (v + v + v) / (3.0 * 255.0)
    }
}

impl RawEnv for ScriptedSim {
    fn reset(&mut self) -> Result<()> {
        if self.fail_reset {
            self.fail_reset = false;
            bail!("scripted reset failure");
        }
        self.resets += 1;
        self.steps = 0;
        Ok(())
    }

    fn observe(&mut self) -> Result<Frame> {
        if self.fail_observe_at == Some(self.steps) {
            self.fail_observe_at = None;
            bail!("scripted observe failure");
        }
        let stamp = (self.steps * Self::STAMP_STEP) as u8;
        Ok(Frame::filled(Self::WIDTH, Self::HEIGHT, stamp))
    }

    fn step(&mut self, _frame_time: Duration, events: &[InputEvent]) -> Result<(f64, bool)> {
        if self.fail_step_at == Some(self.steps + 1) {
            self.fail_step_at = None;
            bail!("scripted step failure");
        }
        self.events_seen.extend_from_slice(events);
        self.steps += 1;
        Ok(self.outcomes.pop_front().unwrap_or((0.0, false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str, down: bool) -> InputEvent {
        if down {
            InputEvent::KeyDown {
                code: code.to_string(),
            }
        } else {
            InputEvent::KeyUp {
                code: code.to_string(),
            }
        }
    }

    #[test]
    fn test_synthetic_game_same_seed_same_episode() {
        let frame_time = Duration::from_millis(100);
        let mut a = SyntheticGame::new(7);
        let mut b = SyntheticGame::new(7);
        a.reset().unwrap();
        b.reset().unwrap();

        for _ in 0..200 {
            let ra = a.step(frame_time, &[]).unwrap();
            let rb = b.step(frame_time, &[]).unwrap();
            assert_eq!(ra, rb);
            assert_eq!(a.observe().unwrap(), b.observe().unwrap());
        }
    }

    #[test]
    fn test_synthetic_game_reset_restores_initial_state() {
        let frame_time = Duration::from_millis(100);
        let mut game = SyntheticGame::new(3);
        game.reset().unwrap();
        let first = game.observe().unwrap();

        for _ in 0..50 {
            game.step(frame_time, &[key("ArrowLeft", true)]).unwrap();
        }

        game.reset().unwrap();
        assert_eq!(game.observe().unwrap(), first);
        assert_eq!(game.caught(), 0);
        assert_eq!(game.missed(), 0);
    }

    #[test]
    fn test_synthetic_game_terminates_after_three_misses() {
        let frame_time = Duration::from_millis(100);
        let mut game = SyntheticGame::new(11);
        game.reset().unwrap();

        // Hold the paddle against the left wall; pellets elsewhere miss.
        let mut done = false;
        let mut steps = 0;
        let events = [key("ArrowLeft", true)];
        while !done {
            let (_, d) = game.step(frame_time, &events).unwrap();
            done = d;
            steps += 1;
            assert!(steps < 10_000, "episode did not terminate");
        }
        assert_eq!(game.missed(), MISS_LIMIT);
    }

    #[test]
    fn test_synthetic_game_held_keys_move_paddle() {
        let frame_time = Duration::from_millis(100);
        let mut game = SyntheticGame::new(0);
        game.reset().unwrap();
        let start = game.paddle_x;

        game.step(frame_time, &[key("ArrowRight", true)]).unwrap();
        game.step(frame_time, &[]).unwrap();
        assert_eq!(game.paddle_x, start + 2);

        game.step(frame_time, &[key("ArrowRight", false)]).unwrap();
        assert_eq!(game.paddle_x, start + 2);
    }

    #[test]
    fn test_scripted_sim_pops_outcomes_in_order() {
        let frame_time = Duration::from_millis(10);
        let mut sim = ScriptedSim::new(vec![(1.0, false), (2.0, true)]);
        sim.reset().unwrap();

        assert_eq!(sim.step(frame_time, &[]).unwrap(), (1.0, false));
        assert_eq!(sim.step(frame_time, &[]).unwrap(), (2.0, true));
        // Script exhausted: neutral outcome.
        assert_eq!(sim.step(frame_time, &[]).unwrap(), (0.0, false));
    }

    #[test]
    fn test_scripted_sim_stamps_frames_per_step() {
        let frame_time = Duration::from_millis(10);
        let mut sim = ScriptedSim::new(vec![(0.0, false); 2]);
        sim.reset().unwrap();

        let f0 = sim.observe().unwrap();
        sim.step(frame_time, &[]).unwrap();
        let f1 = sim.observe().unwrap();

        assert_ne!(f0, f1);
        assert_eq!(f0.rgb(0, 0), (0, 0, 0));
        assert_eq!(f1.rgb(0, 0), (10, 10, 10));
    }

    #[test]
    fn test_scripted_sim_records_events() {
        let frame_time = Duration::from_millis(10);
        let mut sim = ScriptedSim::new(vec![(0.0, false)]);
        sim.reset().unwrap();

        sim.step(frame_time, &[key("ArrowLeft", true)]).unwrap();

        let expected = vec![key("ArrowLeft", true)];
        assert_eq!(sim.events_seen(), expected.as_slice());
    }

    #[test]
    fn test_scripted_failures_are_one_shot() {
        let frame_time = Duration::from_millis(10);
        let mut sim = ScriptedSim::new(vec![(0.0, false); 4]);

        sim.fail_next_reset();
        assert!(sim.reset().is_err());
        assert!(sim.reset().is_ok());

        sim.fail_observe_at(0);
        assert!(sim.observe().is_err());
        assert!(sim.observe().is_ok());

        sim.fail_step_at(1);
        assert!(sim.step(frame_time, &[]).is_err());
        assert!(sim.step(frame_time, &[]).is_ok());
    }
}
