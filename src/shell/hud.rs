//! Frame snapshot and HUD/overlay text handed to the shell

use crate::sim::{Ball, Block, GamePhase, GameState, Item, Paddle};

/// Title shown on the start screen
pub const TITLE: &str = "Block Breaker";

/// Start screen instruction lines (empty strings are spacers)
pub const INSTRUCTIONS: [&str; 9] = [
    "Press Enter to Start",
    "",
    "Move the paddle: <- or ->",
    "",
    "Launch the ball: Space",
    "",
    "Pause: P",
    "",
    "Quit game: Q",
];

/// Numbers shown along the top of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub high_score: u64,
    pub combo: u32,
    pub stage: u32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
            high_score: state.high_score,
            combo: state.combo,
            stage: state.stage,
        }
    }

    /// In-game status lines; the combo line only appears above x1
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Score: {}", self.score),
            format!("High Score: {}", self.high_score),
            format!("Lives: {}", self.lives),
        ];
        if self.combo > 1 {
            lines.push(format!("Combo: x{}", self.combo));
        }
        lines
    }
}

/// Centered overlay text for the non-playing phases
pub fn overlay_text(phase: GamePhase, hud: &Hud) -> Vec<String> {
    match phase {
        GamePhase::StartScreen => std::iter::once(TITLE.to_string())
            .chain(INSTRUCTIONS.iter().map(|s| s.to_string()))
            .collect(),
        GamePhase::Paused => vec!["Paused (Press P to resume)".to_string()],
        // The stage counter has already moved on to the next stage
        GamePhase::StageClear => vec![format!(
            "Stage {} Clear! (Press Enter to continue)",
            hud.stage.saturating_sub(1)
        )],
        GamePhase::GameOver => vec![
            "Game Over".to_string(),
            format!("Final Score: {}", hud.score),
            "Press ESC to retry".to_string(),
        ],
        GamePhase::Playing | GamePhase::Quit => Vec::new(),
    }
}

/// Everything the shell needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub phase: GamePhase,
    pub screen_width: f32,
    pub screen_height: f32,
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub blocks: &'a [Block],
    pub items: &'a [Item],
    pub hud: Hud,
}

impl<'a> Frame<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            screen_width: state.tuning.screen_width,
            screen_height: state.tuning.screen_height,
            paddle: &state.paddle,
            balls: &state.balls,
            blocks: &state.blocks,
            items: &state.items,
            hud: Hud::from_state(state),
        }
    }

    pub fn overlay(&self) -> Vec<String> {
        overlay_text(self.phase, &self.hud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn hud() -> Hud {
        Hud {
            score: 250,
            lives: 2,
            high_score: 900,
            combo: 1,
            stage: 3,
        }
    }

    #[test]
    fn test_combo_line_only_above_one() {
        let mut h = hud();
        assert_eq!(h.lines().len(), 3);
        assert!(h.lines().contains(&"High Score: 900".to_string()));
        h.combo = 4;
        assert_eq!(h.lines().last().unwrap(), "Combo: x4");
    }

    #[test]
    fn test_overlays() {
        let h = hud();
        assert_eq!(
            overlay_text(GamePhase::StageClear, &h),
            vec!["Stage 2 Clear! (Press Enter to continue)"]
        );
        assert_eq!(overlay_text(GamePhase::GameOver, &h)[1], "Final Score: 250");
        assert_eq!(overlay_text(GamePhase::StartScreen, &h)[0], TITLE);
        assert!(overlay_text(GamePhase::Playing, &h).is_empty());
    }

    #[test]
    fn test_frame_borrows_state() {
        let state = GameState::new(Tuning::default(), 8, 77).unwrap();
        let frame = Frame::new(&state);
        assert_eq!(frame.blocks.len(), 40);
        assert_eq!(frame.balls.len(), 1);
        assert_eq!(frame.hud.high_score, 77);
        assert_eq!(frame.overlay()[0], TITLE);
    }
}
