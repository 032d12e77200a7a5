use crate::session::Outcome;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = GameError> = std::result::Result<T, E>;

/// Errors surfaced by the game engine.
///
/// Boundary failures of the external evaluator are not part of this enum:
/// they are absorbed by the arbiter and turned into a local fallback.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read word catalog '{}': {source}", path.display())]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no words available for category '{category}' and the catalog is empty")]
    NoWordsAvailable { category: String },

    #[error("guess must be {expected} letters long (got {actual})")]
    InvalidGuessLength { expected: usize, actual: usize },

    #[error("guess '{guess}' must contain only letters A-Z")]
    InvalidGuessCharacters { guess: String },

    #[error("scoring called with secret of length {secret_len} and guess of length {guess_len}")]
    LengthMismatch { secret_len: usize, guess_len: usize },

    #[error("not enough lives left for a hint ({effective} remaining)")]
    InsufficientLives { effective: u32 },

    #[error("every letter is already revealed")]
    NoLettersLeft,

    #[error("the game has already ended ({outcome})")]
    SessionEnded { outcome: Outcome },

    #[error("no game in progress")]
    NoActiveSession,
}

impl GameError {
    /// True for errors the player can recover from without a new session.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidGuessLength { .. }
                | Self::InvalidGuessCharacters { .. }
                | Self::InsufficientLives { .. }
                | Self::NoLettersLeft
                | Self::SessionEnded { .. }
        )
    }
}
