// Integration tests for the wordle-game application
// These tests verify that all modules work together correctly

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;
use wordle_game::cli::CliInterface;
use wordle_game::evaluator::{OUTCOME_LOST, OUTCOME_ONGOING, OUTCOME_WON};
use wordle_game::stats::StatsStore;
use wordle_game::*;

const CATALOG: &str = "\
APPLE;FRUIT
MANGO;FRUIT
LEMON;FRUIT
TIGER;ANIMAL
HORSE;ANIMAL
CRANE
";

/// An external engine that keeps its own game, like the native module does.
struct ScriptedEvaluator {
    secret: String,
    attempts: i32,
    status: i32,
    log: Rc<RefCell<Vec<String>>>,
}

impl ScriptedEvaluator {
    fn new(secret: &str) -> (Self, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let evaluator = Self {
            secret: secret.to_string(),
            attempts: 5,
            status: OUTCOME_ONGOING,
            log: Rc::clone(&log),
        };
        (evaluator, log)
    }
}

impl ExternalEvaluator for ScriptedEvaluator {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn start_game(&mut self, category: &str) -> std::result::Result<(), EvaluatorError> {
        self.log.borrow_mut().push(format!("start {category}"));
        self.attempts = 5;
        self.status = OUTCOME_ONGOING;
        Ok(())
    }

    fn check_guess(&mut self, word: &str) -> std::result::Result<Vec<LetterStatus>, EvaluatorError> {
        self.log.borrow_mut().push(format!("check {word}"));
        let statuses = score(&self.secret, word).map_err(|e| EvaluatorError::CallFailed {
            capability: Capability::CheckGuess,
            reason: e.to_string(),
        })?;
        if word == self.secret {
            self.status = OUTCOME_WON;
        } else {
            self.attempts -= 1;
            if self.attempts == 0 {
                self.status = OUTCOME_LOST;
            }
        }
        Ok(statuses)
    }

    fn secret(&mut self) -> std::result::Result<String, EvaluatorError> {
        // Lowercase with stray whitespace, as C strings from the module often are
        Ok(format!(" {}\n", self.secret.to_lowercase()))
    }

    fn remaining_attempts(&mut self) -> std::result::Result<i32, EvaluatorError> {
        Ok(self.attempts)
    }

    fn outcome(&mut self) -> std::result::Result<i32, EvaluatorError> {
        Ok(self.status)
    }
}

fn arbiter(evaluator: Option<Box<dyn ExternalEvaluator>>) -> Arbiter {
    Arbiter::with_rng(
        Arc::new(load_catalog_from_str(CATALOG)),
        evaluator,
        StdRng::seed_from_u64(42),
    )
}

#[test]
fn test_authoritative_game_end_to_end() {
    let (evaluator, log) = ScriptedEvaluator::new("TIGER");
    let mut arbiter = arbiter(Some(Box::new(evaluator)));

    let session = arbiter.start("ANIMAL", 5).unwrap();
    assert_eq!(session.backend_mode(), BackendMode::Authoritative);
    assert_eq!(session.word_length(), 5);

    let result = arbiter.submit_guess("horse").unwrap();
    assert_eq!(result.guess(), "HORSE");
    assert_eq!(result.to_string(), "XXYXY");

    let result = arbiter.submit_guess("TIGER").unwrap();
    assert!(result.is_win());

    let snapshot = arbiter.snapshot().unwrap();
    assert_eq!(snapshot.outcome, Outcome::Won);
    assert_eq!(snapshot.attempts_remaining, 4);
    assert_eq!(snapshot.secret.as_deref(), Some("TIGER"));
    assert_eq!(
        *log.borrow(),
        vec!["start ANIMAL", "check HORSE", "check TIGER"]
    );
}

#[test]
fn test_category_without_entries_falls_back_to_full_catalog() {
    let mut arbiter = Arbiter::with_rng(
        Arc::new(load_catalog_from_str("CRANE\nSLATE;GAME\n")),
        None,
        StdRng::seed_from_u64(3),
    );
    let session = arbiter.start("FRUIT", 5).unwrap();
    assert_eq!(session.backend_mode(), BackendMode::Emulated);
    assert_eq!(session.word_length(), 5);
    assert_eq!(session.outcome(), Outcome::Ongoing);
}

#[test]
fn test_empty_external_secret_uses_emulation() {
    let (evaluator, log) = ScriptedEvaluator::new("");
    let mut arbiter = arbiter(Some(Box::new(evaluator)));

    let session = arbiter.start("FRUIT", 5).unwrap();
    assert_eq!(session.backend_mode(), BackendMode::Emulated);

    arbiter.submit_guess("APPLE").unwrap();
    // The evaluator is never asked to score in emulated mode
    assert_eq!(*log.borrow(), vec!["start FRUIT"]);
}

#[test]
fn test_five_wrong_guesses_lose() {
    let mut arbiter = arbiter(None);
    arbiter.start("ANY", 5).unwrap();
    // Letters are all a guess needs; ZZZZZ is not in the catalog
    let wrong = "ZZZZZ";
    for _ in 0..4 {
        arbiter.submit_guess(wrong).unwrap();
    }

    let session = arbiter.session().unwrap();
    assert_eq!(session.attempts_remaining(), 1);
    assert_eq!(session.outcome(), Outcome::Ongoing);
    assert!(session.revealed_secret().is_none());

    arbiter.submit_guess(wrong).unwrap();
    let session = arbiter.session().unwrap();
    assert_eq!(session.attempts_remaining(), 0);
    assert_eq!(session.outcome(), Outcome::Lost);
    assert!(session.revealed_secret().is_some());

    let err = arbiter.submit_guess(wrong).unwrap_err();
    assert!(matches!(err, GameError::SessionEnded { outcome: Outcome::Lost }));
}

#[test]
fn test_hint_refused_at_one_effective_life() {
    let mut arbiter = arbiter(None);
    arbiter.start("ANY", 2).unwrap();

    let first = arbiter.reveal_hint().unwrap();
    let snapshot = arbiter.snapshot().unwrap();
    assert_eq!(snapshot.effective_lives, 1);
    assert_eq!(snapshot.mask.chars().filter(|&c| c != '?').count(), 1);

    let err = arbiter.reveal_hint().unwrap_err();
    assert!(matches!(err, GameError::InsufficientLives { effective: 1 }));
    let session = arbiter.session().unwrap();
    assert_eq!(session.revealed_indices().len(), 1);
    assert!(session.revealed_indices().contains(&first));
    assert_eq!(arbiter.snapshot().unwrap(), snapshot);
}

#[test]
fn test_hints_do_not_reach_authoritative_counter() {
    let (evaluator, log) = ScriptedEvaluator::new("LEMON");
    let mut arbiter = arbiter(Some(Box::new(evaluator)));
    arbiter.start("FRUIT", 5).unwrap();

    arbiter.reveal_hint().unwrap();
    arbiter.reveal_hint().unwrap();

    let snapshot = arbiter.snapshot().unwrap();
    assert_eq!(snapshot.attempts_remaining, 5);
    assert_eq!(snapshot.effective_lives, 3);
    assert_eq!(snapshot.hints_taken, 2);
    assert_eq!(*log.borrow(), vec!["start FRUIT"]);
}

#[test]
fn test_cli_game_loop_with_scripted_input() {
    let (evaluator, _) = ScriptedEvaluator::new("MANGO");
    let mut arbiter = arbiter(Some(Box::new(evaluator)));
    let mut stats = StatsStore::disabled();
    let mut interface = CliInterface::new(Cursor::new("lemon\n/hint\nmango\n/next\n/exit\n"));

    game_loop(&mut arbiter, &GameConfig::default(), &mut stats, &mut interface).unwrap();

    assert_eq!(stats.stats().wins, 1);
    assert_eq!(stats.stats().losses, 0);
    // /next started a fresh session with the same evaluator
    let session = arbiter.session().unwrap();
    assert_eq!(session.outcome(), Outcome::Ongoing);
    assert!(session.history().is_empty());
}

#[test]
fn test_cli_game_loop_stops_at_end_of_input() {
    let mut arbiter = arbiter(None);
    let mut stats = StatsStore::disabled();
    let mut interface = CliInterface::new(Cursor::new("abc\n12345\n"));

    game_loop(&mut arbiter, &GameConfig::default(), &mut stats, &mut interface).unwrap();

    assert_eq!(stats.stats().total(), 0);
    assert!(arbiter.session().unwrap().history().is_empty());
}

#[test]
fn test_catalog_file_to_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    std::fs::write(&path, "# comment\nplant;NATURE\n\nHOUSE;\n").unwrap();

    let catalog = load_catalog_from_file(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.categories(), vec!["NATURE".to_string()]);

    let mut arbiter = Arbiter::with_rng(Arc::new(catalog), None, StdRng::seed_from_u64(1));
    let word_length = arbiter.start("NATURE", 3).unwrap().word_length();
    assert_eq!(word_length, 5);
    let result = arbiter.submit_guess("PLANT").unwrap();
    assert!(result.is_win());
}

#[test]
fn test_stats_persist_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");

    for _ in 0..2 {
        let mut arbiter = Arbiter::with_rng(
            Arc::new(load_catalog_from_str("CRANE\n")),
            None,
            StdRng::seed_from_u64(9),
        );
        let mut stats = StatsStore::open(path.clone());
        let mut interface = CliInterface::new(Cursor::new("crane\n"));
        game_loop(&mut arbiter, &GameConfig::default(), &mut stats, &mut interface).unwrap();
    }

    assert_eq!(StatsStore::open(path).stats().wins, 2);
}

#[test]
fn test_missing_catalog_file_reports_path() {
    let err = load_catalog_from_file("/nonexistent/words.txt").unwrap_err();
    assert!(matches!(err, GameError::CatalogLoad { .. }));
    assert!(err.to_string().contains("/nonexistent/words.txt"));
}
