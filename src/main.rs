//! Block Breaker entry point
//!
//! Loads tuning and the stored high score, then plays an autopilot session
//! through the headless shell.
//!
//! Usage: `block-breaker [tuning.json]`
//! Environment: `BLOCK_BREAKER_SEED` fixes the run seed, `BLOCK_BREAKER_GAMES`
//! sets how many games the autopilot plays (default 3).

use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use block_breaker::shell::{HeadlessShell, run};
use block_breaker::sim::GameState;
use block_breaker::{GameResult, HighScoreStore, Tuning};

/// Safety cap: ten minutes of play at 60 Hz per game
const FRAMES_PER_GAME: u64 = 60 * 60 * 10;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Block Breaker (headless) starting...");

    match play() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("block-breaker: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn play() -> GameResult<()> {
    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(Path::new(&path))?,
        None => Tuning::default(),
    };
    tuning.validate()?;

    let store = HighScoreStore::default();
    let high_score = store.load()?;

    let seed = env_number("BLOCK_BREAKER_SEED").unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    let games = env_number("BLOCK_BREAKER_GAMES").map_or(3, |n| n.max(1) as u32);
    log::info!("Seed {}, playing {} game(s)", seed, games);

    let state = GameState::new(tuning, seed, high_score)?;
    let mut shell = HeadlessShell::new(games, FRAMES_PER_GAME * games as u64);
    let summary = run(&mut shell, state, &store)?;

    println!(
        "Played {} game(s) in {} frames. Best score {}, high score {}, reached stage {}.",
        summary.games_played,
        summary.frames,
        summary.best_score,
        summary.high_score,
        summary.last_stage
    );
    Ok(())
}

fn env_number(name: &str) -> Option<u64> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a number", name, value);
            None
        }
    }
}
