//! Decides, once per session, whether the external evaluator or the local
//! engine scores the game, and routes every gameplay call accordingly.
//!
//! An external secret is trusted only when it is a real catalog word. After
//! that decision the session is pinned: an authoritative session keeps asking
//! the evaluator (falling back to local scoring for a single failed call), an
//! emulated one never talks to the evaluator again.

use crate::error::{GameError, Result};
use crate::evaluator::{
    Capability, EvaluatorError, ExternalEvaluator, OUTCOME_LOST, OUTCOME_ONGOING, OUTCOME_WON,
    normalize_secret,
};
use crate::hint::reveal_hint;
use crate::scoring::{GuessResult, score};
use crate::session::{BackendMode, Outcome, Session, SessionSnapshot};
use crate::wordbank::Catalog;
use crate::{debug_log, info_log};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;

pub struct Arbiter {
    catalog: Arc<Catalog>,
    evaluator: Option<Box<dyn ExternalEvaluator>>,
    session: Option<Session>,
    rng: StdRng,
}

impl Arbiter {
    pub fn new(catalog: Arc<Catalog>, evaluator: Option<Box<dyn ExternalEvaluator>>) -> Self {
        Self::with_rng(catalog, evaluator, StdRng::from_entropy())
    }

    pub fn with_rng(
        catalog: Arc<Catalog>,
        evaluator: Option<Box<dyn ExternalEvaluator>>,
        rng: StdRng,
    ) -> Self {
        if let Some(evaluator) = &evaluator {
            info_log!(
                "External evaluator attached (capabilities: {})",
                evaluator.capabilities()
            );
        }
        Self {
            catalog,
            evaluator,
            session: None,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn has_evaluator(&self) -> bool {
        self.evaluator.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    /// Starts a new session, replacing any previous one.
    ///
    /// On failure the previous session is left as it was.
    pub fn start(&mut self, category: &str, max_attempts: u32) -> Result<&Session> {
        let session = match self.authoritative_secret(category) {
            Some(secret) => {
                info_log!("Using native evaluator secret ({} letters)", secret.len());
                Session::new(secret, max_attempts, BackendMode::Authoritative)
            }
            None => {
                let secret = self.pick_local_secret(category)?;
                info_log!(
                    "Using local emulation for category '{}' ({} letters)",
                    category,
                    secret.len()
                );
                Session::new(secret, max_attempts, BackendMode::Emulated)
            }
        };
        Ok(&*self.session.insert(session))
    }

    /// Asks the evaluator to start a game and returns its secret if it can be
    /// trusted.
    fn authoritative_secret(&mut self, category: &str) -> Option<String> {
        let evaluator = self.evaluator.as_mut()?;

        match evaluator.start_game(category) {
            Ok(()) => {}
            Err(EvaluatorError::Unavailable(_)) => {
                debug_log!("Evaluator has no start_game, reading its current secret anyway");
            }
            Err(e) => log::warn!("Native start_game failed: {e}"),
        }

        let raw = match evaluator.secret() {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not read native secret: {e}");
                return None;
            }
        };
        let secret = normalize_secret(&raw);
        if secret.is_empty() {
            log::warn!("Native evaluator reported an empty secret, switching to emulation");
            return None;
        }
        if !self.catalog.contains_word(&secret) {
            log::warn!(
                "Native secret is not a catalog word ({} letters), switching to emulation",
                secret.len()
            );
            return None;
        }
        Some(secret)
    }

    fn pick_local_secret(&mut self, category: &str) -> Result<String> {
        let mut candidates = self.catalog.words_in(category);
        if candidates.is_empty() {
            debug_log!("No words in category '{}', using the full catalog", category);
            candidates = self.catalog.all_words();
        }
        candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| GameError::NoWordsAvailable {
                category: category.to_string(),
            })
    }

    /// Scores a guess with the session's pinned backend and updates the session.
    pub fn submit_guess(&mut self, guess: &str) -> Result<GuessResult> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveSession)?;
        let guess = session.normalize_guess(guess)?;

        let statuses = match session.backend_mode() {
            BackendMode::Emulated => score(session.secret(), &guess)?,
            BackendMode::Authoritative => {
                let external = self
                    .evaluator
                    .as_mut()
                    .map(|e| e.check_guess(&guess))
                    .unwrap_or(Err(EvaluatorError::Unavailable(Capability::CheckGuess)));
                match external {
                    Ok(statuses) if statuses.len() == guess.len() => statuses,
                    Ok(statuses) => {
                        log::warn!(
                            "Native check_guess returned {} statuses for a {}-letter guess, scoring locally",
                            statuses.len(),
                            guess.len()
                        );
                        score(session.secret(), &guess)?
                    }
                    Err(e) => {
                        log::warn!("Native check_guess failed, scoring locally: {e}");
                        score(session.secret(), &guess)?
                    }
                }
            }
        };

        let result = session.record(guess, statuses);
        debug_log!("Guess {} scored {}", result.guess(), result);

        if session.backend_mode() == BackendMode::Authoritative
            && let Some(evaluator) = self.evaluator.as_mut()
        {
            probe_consistency(&mut **evaluator, session);
        }
        Ok(result)
    }

    /// Reveals a random hidden letter of the current secret.
    pub fn reveal_hint(&mut self) -> Result<usize> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveSession)?;
        reveal_hint(session, &mut self.rng)
    }
}

/// Compares the evaluator's own bookkeeping with the session's. Differences
/// are reported, never applied.
fn probe_consistency(evaluator: &mut dyn ExternalEvaluator, session: &Session) {
    let caps = evaluator.capabilities();
    if caps.has(Capability::Outcome)
        && let Ok(code) = evaluator.outcome()
    {
        let expected = match session.outcome() {
            Outcome::Ongoing => OUTCOME_ONGOING,
            Outcome::Won => OUTCOME_WON,
            Outcome::Lost => OUTCOME_LOST,
        };
        if code != expected {
            log::warn!(
                "Native outcome {code} disagrees with session outcome {}",
                session.outcome()
            );
        }
    }
    if caps.has(Capability::RemainingAttempts)
        && let Ok(remaining) = evaluator.remaining_attempts()
        && i64::from(remaining) != i64::from(session.attempts_remaining())
    {
        log::warn!(
            "Native remaining attempts {remaining} differ from session {}",
            session.attempts_remaining()
        );
    }
}
