//! Letter hints layered on top of a session.
//!
//! A hint costs one life, but the cost is tracked as the number of revealed
//! positions rather than taken from the attempt counter, so the scoring path
//! and the outcome transitions stay untouched.

use crate::error::{GameError, Result};
use crate::info_log;
use crate::session::Session;
use rand::Rng;

pub const MASK_CHAR: char = '?';

/// Secret letters at revealed positions, `?` everywhere else.
pub fn current_mask(session: &Session) -> String {
    let revealed = session.revealed_indices();
    session
        .secret()
        .chars()
        .enumerate()
        .map(|(i, c)| if revealed.contains(&i) { c } else { MASK_CHAR })
        .collect()
}

/// Reveals one random hidden position and returns its index.
///
/// Refused while the player has one effective life or fewer, so a hint can
/// never be what leaves them with nothing.
pub fn reveal_hint<R: Rng>(session: &mut Session, rng: &mut R) -> Result<usize> {
    session.ensure_ongoing()?;

    let effective = session.effective_lives_remaining();
    if effective <= 1 {
        return Err(GameError::InsufficientLives { effective });
    }

    let hidden: Vec<usize> = (0..session.word_length())
        .filter(|i| !session.revealed_indices().contains(i))
        .collect();
    if hidden.is_empty() {
        return Err(GameError::NoLettersLeft);
    }

    let index = hidden[rng.gen_range(0..hidden.len())];
    session.mark_revealed(index);
    info_log!(
        "Hint revealed position {} ({} effective lives left)",
        index,
        session.effective_lives_remaining()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{BackendMode, Outcome};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(secret: &str, attempts: u32) -> Session {
        Session::new(secret.to_string(), attempts, BackendMode::Emulated)
    }

    #[test]
    fn test_mask_starts_hidden() {
        assert_eq!(current_mask(&session("CRANE", 5)), "?????");
    }

    #[test]
    fn test_hint_reveals_letter() {
        let mut s = session("CRANE", 5);
        let mut rng = StdRng::seed_from_u64(7);
        let index = reveal_hint(&mut s, &mut rng).unwrap();
        assert!(index < 5);
        let mask = current_mask(&s);
        assert_eq!(mask.chars().nth(index), "CRANE".chars().nth(index));
        assert_eq!(mask.chars().filter(|c| *c == MASK_CHAR).count(), 4);
        assert_eq!(s.attempts_remaining(), 5);
        assert_eq!(s.effective_lives_remaining(), 4);
    }

    #[test]
    fn test_hints_never_repeat_positions() {
        let mut s = session("AB", 10);
        let mut rng = StdRng::seed_from_u64(1);
        let first = reveal_hint(&mut s, &mut rng).unwrap();
        let second = reveal_hint(&mut s, &mut rng).unwrap();
        assert_ne!(first, second);
        assert_eq!(current_mask(&s), "AB");
        let err = reveal_hint(&mut s, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::NoLettersLeft));
    }

    #[test]
    fn test_hint_refused_at_one_effective_life() {
        let mut s = session("CRANE", 2);
        let mut rng = StdRng::seed_from_u64(3);
        reveal_hint(&mut s, &mut rng).unwrap();
        assert_eq!(s.effective_lives_remaining(), 1);

        let before = s.revealed_indices().clone();
        let err = reveal_hint(&mut s, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InsufficientLives { effective: 1 }));
        assert_eq!(s.revealed_indices(), &before);
    }

    #[test]
    fn test_hint_refused_after_guess_drains_lives() {
        let mut s = session("CRANE", 2);
        let mut rng = StdRng::seed_from_u64(3);
        s.submit_guess("SLOTH").unwrap();
        let err = reveal_hint(&mut s, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InsufficientLives { effective: 1 }));
        assert!(s.revealed_indices().is_empty());
    }

    #[test]
    fn test_hint_refused_after_game_ends() {
        let mut s = session("CRANE", 5);
        let mut rng = StdRng::seed_from_u64(3);
        s.submit_guess("CRANE").unwrap();
        let err = reveal_hint(&mut s, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GameError::SessionEnded {
                outcome: Outcome::Won
            }
        ));
    }
}
