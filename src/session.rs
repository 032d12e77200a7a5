//! Per-game state: the secret, the attempt counter, the outcome and the
//! positions disclosed by hints.
//!
//! `Session::record` is the only place where the outcome changes. Every
//! guess, whichever backend scored it, goes through it.

use crate::error::{GameError, Result};
use crate::hint::current_mask;
use crate::scoring::{GuessResult, LetterStatus, score};
use std::collections::BTreeSet;
use std::fmt;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ongoing => "ongoing",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        f.write_str(text)
    }
}

/// Which engine scores the guesses of a session. Chosen by the arbiter when
/// the session starts and never changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMode {
    Authoritative,
    Emulated,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Authoritative => "native",
            Self::Emulated => "emulated",
        };
        f.write_str(text)
    }
}

#[derive(Debug)]
pub struct Session {
    secret: String,
    max_attempts: u32,
    attempts_remaining: u32,
    outcome: Outcome,
    revealed: BTreeSet<usize>,
    backend_mode: BackendMode,
    history: Vec<GuessResult>,
}

impl Session {
    /// `secret` must already be uppercase letters only.
    pub(crate) fn new(secret: String, max_attempts: u32, backend_mode: BackendMode) -> Self {
        Self {
            secret,
            max_attempts,
            attempts_remaining: max_attempts,
            outcome: Outcome::Ongoing,
            revealed: BTreeSet::new(),
            backend_mode,
            history: Vec::new(),
        }
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    /// The secret, once the game has ended.
    pub fn revealed_secret(&self) -> Option<&str> {
        (self.display_outcome() != Outcome::Ongoing).then_some(self.secret.as_str())
    }

    pub fn word_length(&self) -> usize {
        self.secret.chars().count()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn backend_mode(&self) -> BackendMode {
        self.backend_mode
    }

    pub fn revealed_indices(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    pub fn hints_taken(&self) -> u32 {
        self.revealed.len() as u32
    }

    pub fn history(&self) -> &[GuessResult] {
        &self.history
    }

    /// Attempts left after the hint penalty, floored at zero.
    pub fn effective_lives_remaining(&self) -> u32 {
        self.attempts_remaining.saturating_sub(self.hints_taken())
    }

    /// Outcome as the player should see it: hints that use up every effective
    /// life read as a loss even though the recorded outcome is still ongoing.
    pub fn display_outcome(&self) -> Outcome {
        if self.outcome == Outcome::Ongoing && self.effective_lives_remaining() == 0 {
            Outcome::Lost
        } else {
            self.outcome
        }
    }

    pub fn is_over(&self) -> bool {
        self.display_outcome() != Outcome::Ongoing
    }

    pub(crate) fn ensure_ongoing(&self) -> Result<()> {
        if self.outcome == Outcome::Ongoing {
            Ok(())
        } else {
            Err(GameError::SessionEnded {
                outcome: self.outcome,
            })
        }
    }

    /// Validates a raw guess and returns it trimmed and uppercased.
    ///
    /// Length is taken before any case mapping, so a letter that uppercases
    /// into several (`ß` to `SS`) cannot change it.
    pub(crate) fn normalize_guess(&self, guess: &str) -> Result<String> {
        self.ensure_ongoing()?;
        let guess = guess.trim();
        let actual = guess.chars().count();
        let expected = self.word_length();
        if actual != expected {
            return Err(GameError::InvalidGuessLength { expected, actual });
        }
        if !guess.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GameError::InvalidGuessCharacters {
                guess: guess.to_string(),
            });
        }
        Ok(guess.to_ascii_uppercase())
    }

    /// Scores the guess locally and applies it.
    pub fn submit_guess(&mut self, guess: &str) -> Result<GuessResult> {
        let guess = self.normalize_guess(guess)?;
        let statuses = score(&self.secret, &guess)?;
        Ok(self.record(guess, statuses))
    }

    /// Applies an already scored, already validated guess.
    pub(crate) fn record(&mut self, guess: String, statuses: Vec<LetterStatus>) -> GuessResult {
        let result = GuessResult::new(guess, statuses);
        if result.is_win() {
            self.outcome = Outcome::Won;
        } else {
            self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
            if self.attempts_remaining == 0 {
                self.outcome = Outcome::Lost;
            }
        }
        self.history.push(result.clone());
        result
    }

    pub(crate) fn mark_revealed(&mut self, index: usize) {
        debug_assert!(index < self.word_length());
        self.revealed.insert(index);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mask: current_mask(self),
            word_length: self.word_length(),
            attempts_remaining: self.attempts_remaining,
            max_attempts: self.max_attempts,
            effective_lives: self.effective_lives_remaining(),
            hints_taken: self.hints_taken(),
            outcome: self.display_outcome(),
            backend_mode: self.backend_mode,
            secret: self.revealed_secret().map(str::to_string),
        }
    }
}

/// Read-only copy of what a frontend needs to draw a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mask: String,
    pub word_length: usize,
    pub attempts_remaining: u32,
    pub max_attempts: u32,
    pub effective_lives: u32,
    pub hints_taken: u32,
    pub outcome: Outcome,
    pub backend_mode: BackendMode,
    pub secret: Option<String>,
}
