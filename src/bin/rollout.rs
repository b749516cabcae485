// src/bin/rollout.rs
//
// Smoke-rollout harness: runs the built-in synthetic game through the
// full adapter with a random policy and prints per-episode summaries as
// JSON.
//
// Usage:
//   cargo run --bin rollout -- --episodes 8 --seed 3 --log events.jsonl

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use pixelgym::{
    run_episode, DownsampleObserver, EnvConfig, FileSink, GymEnv, KeyActor, RandomPolicy,
    SyntheticGame,
};

#[derive(Debug, Parser)]
#[command(
    name = "rollout",
    about = "Run random rollouts against the built-in synthetic game"
)]
struct Args {
    /// Number of episodes to run.
    #[arg(long, default_value_t = 4)]
    episodes: u64,

    /// Seed for the synthetic game and the random policy.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// History size H (stacked feature vectors per observation).
    #[arg(long, default_value_t = 4)]
    history: usize,

    /// Step limit per episode.
    #[arg(long, default_value_t = 200)]
    max_steps: u64,

    /// Reward scale (0 leaves rewards unmodified).
    #[arg(long, default_value_t = 0.0)]
    reward_scale: f64,

    /// Frame duration in milliseconds.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,

    /// Downsampling stride for the observer.
    #[arg(long, default_value_t = 4)]
    stride: usize,

    /// Optional JSONL lifecycle-event log.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = EnvConfig::default()
        .with_history_size(args.history)
        .with_max_steps(args.max_steps)
        .with_reward_scale(args.reward_scale)
        .with_frame_time(Duration::from_millis(args.frame_ms));

    let game = SyntheticGame::new(args.seed);
    let actor = KeyActor::new(vec!["ArrowLeft".to_string(), "ArrowRight".to_string()]);
    let observer = DownsampleObserver::new(SyntheticGame::WIDTH, SyntheticGame::HEIGHT, args.stride)?;

    let mut env = GymEnv::new(Box::new(game), Box::new(actor), Box::new(observer), config)?;
    if let Some(path) = &args.log {
        env = env.with_sink(Box::new(FileSink::create(path)?));
    }

    let mut policy = RandomPolicy::new(args.seed, 2);
    let mut summaries = Vec::with_capacity(args.episodes as usize);
    for episode_id in 0..args.episodes {
        summaries.push(run_episode(&mut env, episode_id, |obs| policy.act(obs)));
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
