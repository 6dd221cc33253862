//! Frame loop binding a [`Shell`] to the simulation
//!
//! One iteration per frame: read input (or block on a waiting screen), tick
//! once, persist a new record if one was set, then render.

use super::{Command, Frame, InputSet, Shell};
use crate::consts::SIM_DT_MS;
use crate::error::GameResult;
use crate::highscores::HighScoreStore;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Totals reported when the loop ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub games_played: u32,
    pub best_score: u64,
    pub high_score: u64,
    pub last_stage: u32,
}

/// Run until the player quits
pub fn run<S: Shell>(
    shell: &mut S,
    mut state: GameState,
    store: &HighScoreStore,
) -> GameResult<RunSummary> {
    let mut summary = RunSummary {
        frames: 0,
        games_played: 0,
        best_score: 0,
        high_score: state.high_score,
        last_stage: state.stage,
    };

    shell.render_frame(&Frame::new(&state));
    loop {
        let input = match state.phase {
            GamePhase::Playing => shell.poll_input().to_tick_input(state.phase),
            GamePhase::StartScreen | GamePhase::StageClear => {
                wait_input(shell.wait_for_confirm(), Command::Confirm, state.phase)
            }
            GamePhase::Paused => wait_input(shell.wait_for_resume(), Command::Resume, state.phase),
            GamePhase::GameOver => wait_input(shell.wait_for_retry(), Command::Retry, state.phase),
            GamePhase::Quit => break,
        };

        tick(&mut state, &input, SIM_DT_MS);
        summary.frames += 1;
        summary.last_stage = state.stage;

        for event in state.drain_events() {
            match event {
                GameEvent::GameOver { score } => {
                    summary.games_played += 1;
                    summary.best_score = summary.best_score.max(score);
                }
                GameEvent::NewHighScore { score } => {
                    summary.high_score = score;
                    if let Err(e) = store.save(score) {
                        log::error!("Could not save high score: {}", e);
                    }
                }
                GameEvent::Quit => log::info!("Leaving after {} frames", summary.frames),
                _ => {}
            }
        }

        shell.render_frame(&Frame::new(&state));
        shell.end_frame();
    }

    Ok(summary)
}

/// Turn the result of a blocking wait into the matching one-shot input
fn wait_input(pressed: bool, wanted: Command, phase: GamePhase) -> TickInput {
    let command = if pressed { wanted } else { Command::Quit };
    std::iter::once(command).collect::<InputSet>().to_tick_input(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Plays back a fixed script, then quits
    struct Scripted {
        script: Vec<InputSet>,
        rendered: Vec<GamePhase>,
    }

    impl Shell for Scripted {
        fn render_frame(&mut self, frame: &Frame<'_>) {
            self.rendered.push(frame.phase);
        }

        fn poll_input(&mut self) -> InputSet {
            if self.script.is_empty() {
                std::iter::once(Command::Quit).collect()
            } else {
                self.script.remove(0)
            }
        }
    }

    fn temp_store(name: &str) -> HighScoreStore {
        let path = std::env::temp_dir().join(format!(
            "block_breaker_runner_{}_{}.txt",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        HighScoreStore::new(path)
    }

    #[test]
    fn test_start_pause_quit() {
        let state = GameState::new(Tuning::default(), 3, 0).unwrap();
        let one = |c: Command| std::iter::once(c).collect::<InputSet>();
        let mut shell = Scripted {
            script: vec![
                one(Command::Confirm),
                one(Command::MoveLeft),
                one(Command::Pause),
                InputSet::default(),
                one(Command::Resume),
                one(Command::Quit),
            ],
            rendered: Vec::new(),
        };
        let store = temp_store("pause");
        let summary = run(&mut shell, state, &store).unwrap();

        assert_eq!(
            shell.rendered,
            vec![
                GamePhase::StartScreen,
                GamePhase::Playing,
                GamePhase::Playing,
                GamePhase::Paused,
                GamePhase::Playing,
                GamePhase::Quit,
            ]
        );
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.games_played, 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_new_record_is_saved() {
        let mut state = GameState::new(Tuning::default(), 3, 10).unwrap();
        state.phase = GamePhase::Playing;
        state.lives = 1;
        state.score = 640;
        // Drop the only ball below the floor
        state.balls[0].launched = true;
        state.balls[0].pos.y = 2000.0;

        let mut shell = Scripted {
            script: vec![InputSet::default()],
            rendered: Vec::new(),
        };
        let store = temp_store("record");
        let summary = run(&mut shell, state, &store).unwrap();

        assert_eq!(summary.games_played, 1);
        assert_eq!(summary.best_score, 640);
        assert_eq!(summary.high_score, 640);
        assert_eq!(store.load().unwrap(), 640);
        let _ = std::fs::remove_file(store.path());
    }
}
