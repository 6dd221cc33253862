//! Presentation/input collaborator
//!
//! The simulation never draws or reads keys itself. A [`Shell`] renders each
//! [`Frame`] and reports which logical [`Command`]s are active; the
//! [`runner`] binds a shell to a [`GameState`](crate::sim::GameState).

pub mod headless;
pub mod hud;
pub mod runner;

pub use headless::HeadlessShell;
pub use hud::{Frame, Hud};
pub use runner::{RunSummary, run};

use crate::sim::{GamePhase, TickInput};

/// Logical keyboard commands, independent of the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Left arrow (held)
    MoveLeft,
    /// Right arrow (held)
    MoveRight,
    /// Space
    Launch,
    /// P while playing
    Pause,
    /// P while paused
    Resume,
    /// Enter
    Confirm,
    /// Escape after game over
    Retry,
    /// Q
    Quit,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::Launch,
        Command::Pause,
        Command::Resume,
        Command::Confirm,
        Command::Retry,
        Command::Quit,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of commands active during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSet(u8);

impl InputSet {
    pub fn insert(&mut self, command: Command) {
        self.0 |= command.bit();
    }

    pub fn contains(&self, command: Command) -> bool {
        self.0 & command.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        Command::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Map onto simulation input for the current phase
    ///
    /// Pause toggles anywhere; Resume only counts on the pause screen, so it
    /// can never pause a running game.
    pub fn to_tick_input(&self, phase: GamePhase) -> TickInput {
        let resume = phase == GamePhase::Paused && self.contains(Command::Resume);
        TickInput {
            move_left: self.contains(Command::MoveLeft),
            move_right: self.contains(Command::MoveRight),
            launch: self.contains(Command::Launch),
            pause: self.contains(Command::Pause) || resume,
            confirm: self.contains(Command::Confirm),
            retry: self.contains(Command::Retry),
            quit: self.contains(Command::Quit),
        }
    }
}

impl FromIterator<Command> for InputSet {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut set = InputSet::default();
        for command in iter {
            set.insert(command);
        }
        set
    }
}

/// Rendering and input primitives the game loop relies on
pub trait Shell {
    /// Draw the entities and HUD for one frame
    fn render_frame(&mut self, frame: &Frame<'_>);

    /// Commands active right now (held keys plus fresh presses)
    fn poll_input(&mut self) -> InputSet;

    /// Called once per frame after rendering; real shells sleep to hold 60 Hz
    fn end_frame(&mut self) {}

    /// Block until `wanted` is pressed. Returns false if Quit came first.
    fn wait_for(&mut self, wanted: Command) -> bool {
        loop {
            let input = self.poll_input();
            if input.contains(Command::Quit) {
                return false;
            }
            if input.contains(wanted) {
                return true;
            }
        }
    }

    fn wait_for_confirm(&mut self) -> bool {
        self.wait_for(Command::Confirm)
    }

    fn wait_for_resume(&mut self) -> bool {
        self.wait_for(Command::Resume)
    }

    fn wait_for_retry(&mut self) -> bool {
        self.wait_for(Command::Retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_set_membership() {
        let set: InputSet = [Command::MoveLeft, Command::Launch].into_iter().collect();
        assert!(set.contains(Command::MoveLeft));
        assert!(set.contains(Command::Launch));
        assert!(!set.contains(Command::MoveRight));
        assert_eq!(set.iter().count(), 2);
        assert!(InputSet::default().is_empty());
    }

    #[test]
    fn test_resume_only_unpauses() {
        let pause: InputSet = [Command::Pause].into_iter().collect();
        let resume: InputSet = [Command::Resume].into_iter().collect();
        assert!(pause.to_tick_input(GamePhase::Playing).pause);
        assert!(pause.to_tick_input(GamePhase::Paused).pause);
        assert!(resume.to_tick_input(GamePhase::Paused).pause);
        assert!(!resume.to_tick_input(GamePhase::Playing).pause);
        assert_eq!(resume.to_tick_input(GamePhase::Playing), TickInput::default());
    }

    #[test]
    fn test_to_tick_input() {
        let set: InputSet = [Command::MoveRight, Command::Confirm, Command::Quit]
            .into_iter()
            .collect();
        let input = set.to_tick_input(GamePhase::Playing);
        assert!(input.move_right && input.confirm && input.quit);
        assert!(!input.move_left && !input.launch && !input.retry);
    }

    struct Scripted(Vec<InputSet>);

    impl Shell for Scripted {
        fn render_frame(&mut self, _frame: &Frame<'_>) {}

        fn poll_input(&mut self) -> InputSet {
            if self.0.is_empty() {
                [Command::Quit].into_iter().collect()
            } else {
                self.0.remove(0)
            }
        }
    }

    #[test]
    fn test_wait_for_skips_other_keys() {
        let mut shell = Scripted(vec![
            [Command::Launch].into_iter().collect(),
            InputSet::default(),
            [Command::Confirm].into_iter().collect(),
        ]);
        assert!(shell.wait_for_confirm());
        assert!(shell.0.is_empty());
    }

    #[test]
    fn test_wait_for_stops_on_quit() {
        let mut shell = Scripted(vec![[Command::Pause].into_iter().collect()]);
        assert!(!shell.wait_for_resume());
    }
}
