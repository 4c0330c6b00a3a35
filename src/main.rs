//! Tick Arcade headless runner
//!
//! Plays a session with the built-in autopilot against a recording host, so the
//! engine can be exercised without a display. Each game-over is answered with
//! "Play Again" until the tick budget runs out; the session then exits through
//! the exit dialog like a player would.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tick_arcade::autopilot;
use tick_arcade::persistence::{JsonFileStore, KvStore, MemoryStore};
use tick_arcade::platform::headless::HeadlessHost;
use tick_arcade::sim::{Lfsr16, PcgSource, RandomSource, session_seed};
use tick_arcade::{GameConfig, GameSession, Key, SessionState, Variant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Runner,
    Snake,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Runner => Variant::Runner,
            VariantArg::Snake => Variant::Snake,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RngArg {
    /// 16-bit LFSR, same sequence as the handheld
    Lfsr,
    /// PCG32
    Pcg,
}

/// Run a tick-driven arcade game headless with the autopilot at the controls
#[derive(Parser, Debug)]
#[command(name = "tick-arcade")]
#[command(version)]
#[command(about = "Headless runner for the tick-driven arcade games")]
struct Cli {
    /// Game to play
    #[arg(short = 'g', long, value_enum, default_value = "runner")]
    variant: VariantArg,

    /// Random seed (defaults to one derived from the clock)
    #[arg(short, long)]
    seed: Option<u16>,

    /// Ticks to deliver before exiting
    #[arg(short, long, default_value_t = 2000)]
    ticks: u64,

    /// Tuning file (JSON); defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// High-score store file (JSON); in-memory when absent
    #[arg(long)]
    store: Option<PathBuf>,

    /// Random source
    #[arg(long, value_enum, default_value = "lfsr")]
    rng: RngArg,

    /// Print the final session snapshot as JSON
    #[arg(long)]
    dump_state: bool,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    match &cli.store {
        Some(path) => run(&cli, config, HeadlessHost::with_store(JsonFileStore::open(path))),
        None => run(&cli, config, HeadlessHost::with_store(MemoryStore::new())),
    }
}

fn make_rng(kind: RngArg, seed: u16) -> Box<dyn RandomSource> {
    match kind {
        RngArg::Lfsr => Box::new(Lfsr16::new(seed)),
        RngArg::Pcg => Box::new(PcgSource::new(seed as u64)),
    }
}

fn clock_ticks() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(0)
}

/// Finished runs and the best score among them
#[derive(Debug, Default, PartialEq, Eq)]
struct RunTally {
    runs: u32,
    best_run: u16,
}

impl RunTally {
    fn finish_run(&mut self, score: u16) {
        self.runs += 1;
        self.best_run = self.best_run.max(score);
        log::info!("Run {} ended with score {}", self.runs, score);
    }

    /// Account for the run still on screen when the tick budget ran out
    fn settle(&mut self, session: &GameSession) {
        match session.state() {
            SessionState::GameOverConfirm | SessionState::Over => self.finish_run(session.score()),
            SessionState::Running | SessionState::Paused => {
                self.best_run = self.best_run.max(session.score())
            }
            _ => {}
        }
    }
}

fn run<S: KvStore>(cli: &Cli, config: GameConfig, mut host: HeadlessHost<S>) -> Result<()> {
    let variant = Variant::from(cli.variant);
    let seed = cli.seed.unwrap_or_else(|| session_seed(clock_ticks()));
    log::info!("Playing {} with seed {:#06x}", variant.as_str(), seed);

    let mut session = GameSession::new(variant, config, make_rng(cli.rng, seed), &host.store);
    session.start(&mut host);

    let mut tally = RunTally::default();
    for _ in 0..cli.ticks {
        match session.state() {
            SessionState::Running => {
                if let Some(key) = autopilot::suggest(session.game(), session.config()) {
                    session.on_key(key, &mut host);
                }
                session.on_tick(&mut host);
            }
            SessionState::GameOverConfirm => {
                tally.finish_run(session.score());
                // Selection 0 is "Play Again"
                session.on_key(Key::Enter, &mut host);
            }
            _ => break,
        }
    }
    tally.settle(&session);

    // Leave the way a player would: Esc, move to "Yes", confirm
    if session.state() != SessionState::GameOverConfirm {
        session.on_key(Key::Esc, &mut host);
    }
    session.on_key(Key::Right, &mut host);
    session.on_key(Key::Enter, &mut host);

    println!(
        "{}: {} ticks, {} finished runs, best run {}, high score {}",
        variant.as_str(),
        session.ticks(),
        tally.runs,
        tally.best_run,
        session.high_score()
    );

    if cli.dump_state {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("Failed to serialize session snapshot")?;
        println!("{}", json);
    }

    if session.state() != SessionState::Closed {
        anyhow::bail!("Session did not close (state {:?})", session.state());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ending_on_last_tick_is_counted() {
        let mut host = HeadlessHost::new();
        let mut session =
            GameSession::with_seed(Variant::Runner, GameConfig::default(), 9, &host.store);
        session.start(&mut host);
        while !session.on_tick(&mut host).collided {}
        assert_eq!(session.state(), SessionState::GameOverConfirm);

        let mut tally = RunTally::default();
        tally.settle(&session);
        assert_eq!(tally, RunTally { runs: 1, best_run: 0 });
    }

    #[test]
    fn test_unfinished_run_only_raises_best() {
        let mut tally = RunTally::default();
        tally.finish_run(3);
        let mut host = HeadlessHost::new();
        let mut session =
            GameSession::with_seed(Variant::Runner, GameConfig::default(), 9, &host.store);
        session.start(&mut host);
        tally.settle(&session);
        assert_eq!(tally, RunTally { runs: 1, best_run: 3 });
    }
}
