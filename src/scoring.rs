use crate::error::{GameError, Result};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LetterStatus {
    Absent,
    Present,
    Correct,
}

impl LetterStatus {
    /// Decodes the integer codes used across the external evaluator boundary.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Absent),
            1 => Some(Self::Present),
            2 => Some(Self::Correct),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Absent => 0,
            Self::Present => 1,
            Self::Correct => 2,
        }
    }

    /// G/Y/X, the notation players use when writing Wordle feedback down.
    pub fn as_char(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }
}

/// Per-letter verdict for one submitted guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessResult {
    guess: String,
    statuses: Vec<LetterStatus>,
}

impl GuessResult {
    pub(crate) fn new(guess: String, statuses: Vec<LetterStatus>) -> Self {
        debug_assert_eq!(guess.chars().count(), statuses.len());
        Self { guess, statuses }
    }

    pub fn guess(&self) -> &str {
        &self.guess
    }

    pub fn statuses(&self) -> &[LetterStatus] {
        &self.statuses
    }

    pub fn is_win(&self) -> bool {
        !self.statuses.is_empty() && self.statuses.iter().all(|s| *s == LetterStatus::Correct)
    }

    /// Pairs each guessed letter with its status.
    pub fn letters(&self) -> impl Iterator<Item = (char, LetterStatus)> + '_ {
        self.guess.chars().zip(self.statuses.iter().copied())
    }
}

impl fmt::Display for GuessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in &self.statuses {
            write!(f, "{}", status.as_char())?;
        }
        Ok(())
    }
}

/// Scores `guess` against `secret` letter by letter.
///
/// Exact matches are claimed first, then remaining letters are credited as
/// present only while the secret still has unclaimed copies of them, so a
/// duplicated letter in the guess is never credited more often than it
/// occurs in the secret.
pub fn score(secret: &str, guess: &str) -> Result<Vec<LetterStatus>> {
    let secret: Vec<char> = secret.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    if secret.len() != guess.len() {
        return Err(GameError::LengthMismatch {
            secret_len: secret.len(),
            guess_len: guess.len(),
        });
    }

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for &c in &secret {
        *remaining.entry(c).or_insert(0) += 1;
    }

    let mut statuses = vec![LetterStatus::Absent; guess.len()];
    for (i, (&g, &s)) in guess.iter().zip(&secret).enumerate() {
        if g == s {
            statuses[i] = LetterStatus::Correct;
            if let Some(count) = remaining.get_mut(&g) {
                *count -= 1;
            }
        }
    }

    for (i, g) in guess.iter().enumerate() {
        if statuses[i] == LetterStatus::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(g)
            && *count > 0
        {
            statuses[i] = LetterStatus::Present;
            *count -= 1;
        }
    }

    Ok(statuses)
}
