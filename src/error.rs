//! Error types for the non-simulation layers
//!
//! The simulation itself never fails: empty ball or block collections are
//! phase transitions. Errors only come from tuning files and the high score
//! file.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error enum
#[derive(Debug)]
pub enum GameError {
    /// Reading or writing a file failed
    Io { path: PathBuf, source: io::Error },

    /// A tuning file exists but is not valid JSON for [`crate::Tuning`]
    TuningParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A tuning value is outside its usable range
    InvalidTuning {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// Item drop weights cannot form a distribution
    ItemWeights(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path.display(), source)
            }
            GameError::TuningParse { path, source } => {
                write!(f, "invalid tuning file '{}': {}", path.display(), source)
            }
            GameError::InvalidTuning {
                name,
                value,
                reason,
            } => write!(f, "tuning '{}' = {} is invalid: {}", name, value, reason),
            GameError::ItemWeights(msg) => write!(f, "invalid item weights: {}", msg),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            GameError::TuningParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_tuning() {
        let err = GameError::InvalidTuning {
            name: "paddle_width",
            value: -1.0,
            reason: "must be positive",
        };
        assert_eq!(
            err.to_string(),
            "tuning 'paddle_width' = -1 is invalid: must be positive"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;

        let err = GameError::Io {
            path: PathBuf::from("highscore.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("highscore.txt"));
    }
}
