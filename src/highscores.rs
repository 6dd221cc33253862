//! High score persistence
//!
//! A single decimal integer in a flat text file. Read once at startup,
//! rewritten only when a game ends on a new record.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{GameError, GameResult};

/// Default file name, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

/// Flat-file high score store
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl Default for HighScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored high score
    ///
    /// A missing file is a score of zero. Unparseable contents are also zero,
    /// with a warning. Any other I/O failure is returned.
    pub fn load(&self) -> GameResult<u64> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting from 0", self.path.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(GameError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match text.trim().parse::<u64>() {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                Ok(score)
            }
            Err(e) => {
                log::warn!(
                    "Ignoring malformed high score file {} ({}), using 0",
                    self.path.display(),
                    e
                );
                Ok(0)
            }
        }
    }

    /// Overwrite the stored value (temp file then rename)
    pub fn save(&self, score: u64) -> GameResult<()> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, score.to_string()).map_err(|source| GameError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| GameError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }

    /// Save `score` only if it beats `previous`; returns whether it was written
    pub fn record(&self, score: u64, previous: u64) -> GameResult<bool> {
        if score <= previous {
            return Ok(false);
        }
        self.save(score)?;
        Ok(true)
    }
}
