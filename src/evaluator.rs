//! The boundary to an external, authoritative game evaluator.
//!
//! Implementations expose a fixed set of optional capabilities. Which ones are
//! present is decided once, when the evaluator is created, and a call to a
//! missing one fails with [`EvaluatorError::Unavailable`] instead of being
//! looked up again.

use crate::scoring::LetterStatus;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Initialize,
    StartGame,
    CheckGuess,
    Secret,
    RemainingAttempts,
    Outcome,
}

impl Capability {
    pub const ALL: [Self; 6] = [
        Self::Initialize,
        Self::StartGame,
        Self::CheckGuess,
        Self::Secret,
        Self::RemainingAttempts,
        Self::Outcome,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::StartGame => "start_game",
            Self::CheckGuess => "check_guess",
            Self::Secret => "secret",
            Self::RemainingAttempts => "remaining_attempts",
            Self::Outcome => "outcome",
        };
        f.write_str(name)
    }
}

/// The capabilities an evaluator actually provides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);

    fn bit(capability: Capability) -> u8 {
        1 << (capability as u8)
    }

    pub fn all() -> Self {
        Capability::ALL
            .into_iter()
            .fold(Self::NONE, |caps, cap| caps.with(cap))
    }

    #[must_use]
    pub fn with(self, capability: Capability) -> Self {
        Self(self.0 | Self::bit(capability))
    }

    #[must_use]
    pub fn without(self, capability: Capability) -> Self {
        Self(self.0 & !Self::bit(capability))
    }

    pub fn has(self, capability: Capability) -> bool {
        self.0 & Self::bit(capability) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.has(*c))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluator does not provide {0}")]
    Unavailable(Capability),

    #[error("failed to load evaluator library '{}': {reason}", path.display())]
    LoadFailed { path: PathBuf, reason: String },

    #[error("evaluator call {capability} failed: {reason}")]
    CallFailed {
        capability: Capability,
        reason: String,
    },

    #[error("evaluator call {capability} returned unusable data: {detail}")]
    MalformedResponse {
        capability: Capability,
        detail: String,
    },

    #[error("external evaluators are not supported on this platform")]
    Unsupported,
}

/// Outcome codes reported by the evaluator.
pub const OUTCOME_ONGOING: i32 = 0;
pub const OUTCOME_WON: i32 = 1;
pub const OUTCOME_LOST: i32 = -1;

/// A single-slot external game engine: it holds at most one game at a time,
/// so each instance must be owned by exactly one arbiter.
///
/// Everything returned is owned by the caller; implementations copy data
/// out of the foreign side before returning.
pub trait ExternalEvaluator {
    fn capabilities(&self) -> Capabilities;

    fn start_game(&mut self, category: &str) -> Result<(), EvaluatorError>;

    /// Per-letter statuses for `word`, one per letter.
    fn check_guess(&mut self, word: &str) -> Result<Vec<LetterStatus>, EvaluatorError>;

    /// The current secret. May be empty when the evaluator has none.
    fn secret(&mut self) -> Result<String, EvaluatorError>;

    fn remaining_attempts(&mut self) -> Result<i32, EvaluatorError>;

    /// One of [`OUTCOME_ONGOING`], [`OUTCOME_WON`], [`OUTCOME_LOST`].
    fn outcome(&mut self) -> Result<i32, EvaluatorError>;
}

/// Converts raw status codes from the foreign side, rejecting unknown codes
/// and results whose length does not match the guess.
pub fn decode_statuses(codes: &[i32], expected_len: usize) -> Result<Vec<LetterStatus>, EvaluatorError> {
    if codes.len() != expected_len {
        return Err(EvaluatorError::MalformedResponse {
            capability: Capability::CheckGuess,
            detail: format!("expected {expected_len} statuses, got {}", codes.len()),
        });
    }
    codes
        .iter()
        .map(|&code| {
            LetterStatus::from_code(code).ok_or_else(|| EvaluatorError::MalformedResponse {
                capability: Capability::CheckGuess,
                detail: format!("unknown status code {code}"),
            })
        })
        .collect()
}

/// Uppercases a secret reported by the evaluator and drops everything that is
/// not an ASCII letter.
pub fn normalize_secret(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_set() {
        let caps = Capabilities::NONE
            .with(Capability::Secret)
            .with(Capability::CheckGuess);
        assert!(caps.has(Capability::Secret));
        assert!(caps.has(Capability::CheckGuess));
        assert!(!caps.has(Capability::StartGame));
        assert_eq!(caps.to_string(), "check_guess, secret");
        assert_eq!(Capabilities::NONE.to_string(), "none");
    }

    #[test]
    fn test_all_capabilities() {
        let all = Capabilities::all();
        assert_eq!(all.iter().count(), Capability::ALL.len());
        assert!(!all.without(Capability::Outcome).has(Capability::Outcome));
    }

    #[test]
    fn test_decode_statuses() {
        let statuses = decode_statuses(&[2, 1, 0], 3).unwrap();
        assert_eq!(
            statuses,
            vec![
                LetterStatus::Correct,
                LetterStatus::Present,
                LetterStatus::Absent
            ]
        );
    }

    #[test]
    fn test_decode_rejects_bad_codes() {
        assert!(matches!(
            decode_statuses(&[2, 7, 0], 3),
            Err(EvaluatorError::MalformedResponse { .. })
        ));
        assert!(matches!(
            decode_statuses(&[2, 2], 3),
            Err(EvaluatorError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_normalize_secret() {
        assert_eq!(normalize_secret("crane"), "CRANE");
        assert_eq!(normalize_secret(" Cr\u{0}an-e\n"), "CRANE");
        assert_eq!(normalize_secret("\u{fffd}\u{fffd}"), "");
    }
}
