use crate::arbiter::Arbiter;
use crate::error::{GameError, Result};
use crate::scoring::GuessResult;
use crate::session::{DEFAULT_MAX_ATTEMPTS, Outcome, SessionSnapshot};
use crate::stats::{GameStats, StatsStore};
use crate::wordbank::ANY_CATEGORY;
use crate::{debug_log, info_log};

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Hint,
    NewGame,
    Exit,
}

/// Options for one run of the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub category: String,
    pub max_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            category: ANY_CATEGORY.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Trait abstracting the frontend (line-based CLI or TUI).
pub trait GameInterface {
    fn display_new_game(&mut self, snapshot: &SessionSnapshot, category: &str);
    /// `None` means nothing usable was entered; the loop simply asks again.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_guess_result(&mut self, result: &GuessResult, snapshot: &SessionSnapshot);
    fn display_hint(&mut self, index: usize, snapshot: &SessionSnapshot);
    /// Recoverable problems such as a guess of the wrong length.
    fn display_notice(&mut self, message: &str);
    fn display_game_over(&mut self, snapshot: &SessionSnapshot, stats: &GameStats);
    fn display_exit_message(&mut self);
}

enum Step {
    Continue,
    Exit,
}

/// Drives sessions until the player exits.
///
/// Only fatal errors (an empty catalog) are returned; everything else is
/// shown through [`GameInterface::display_notice`].
pub fn game_loop<I: GameInterface>(
    arbiter: &mut Arbiter,
    config: &GameConfig,
    stats: &mut StatsStore,
    interface: &mut I,
) -> Result<()> {
    start_new_game(arbiter, config, interface)?;
    let mut recorded = false;

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        if let Step::Exit = handle_action(arbiter, config, stats, interface, action, &mut recorded)? {
            interface.display_exit_message();
            return Ok(());
        }

        let Some(snapshot) = arbiter.snapshot() else {
            continue;
        };
        if snapshot.outcome != Outcome::Ongoing && !recorded {
            stats.record(snapshot.outcome == Outcome::Won);
            recorded = true;
            info_log!("Game finished: {}", snapshot.outcome);
            interface.display_game_over(&snapshot, &stats.stats());
        }
    }
}

fn handle_action<I: GameInterface>(
    arbiter: &mut Arbiter,
    config: &GameConfig,
    stats: &mut StatsStore,
    interface: &mut I,
    action: UserAction,
    recorded: &mut bool,
) -> Result<Step> {
    match action {
        UserAction::Exit => return Ok(Step::Exit),
        UserAction::NewGame => {
            // Giving up on a running game counts as losing it.
            if arbiter.session().is_some_and(|s| !s.is_over()) {
                info_log!("Game abandoned, recording a loss");
                stats.record(false);
            }
            start_new_game(arbiter, config, interface)?;
            *recorded = false;
        }
        UserAction::Guess(_) | UserAction::Hint
            if arbiter.session().is_some_and(|s| s.is_over()) =>
        {
            interface.display_notice("The game is over. Start a new game or exit.");
        }
        UserAction::Guess(guess) => match arbiter.submit_guess(&guess) {
            Ok(result) => {
                if let Some(snapshot) = arbiter.snapshot() {
                    interface.display_guess_result(&result, &snapshot);
                }
            }
            Err(e) => report(interface, e)?,
        },
        UserAction::Hint => match arbiter.reveal_hint() {
            Ok(index) => {
                if let Some(snapshot) = arbiter.snapshot() {
                    interface.display_hint(index, &snapshot);
                }
            }
            Err(e) => report(interface, e)?,
        },
    }
    Ok(Step::Continue)
}

fn report<I: GameInterface>(interface: &mut I, error: GameError) -> Result<()> {
    if error.is_recoverable() {
        interface.display_notice(&error.to_string());
        Ok(())
    } else {
        Err(error)
    }
}

fn start_new_game<I: GameInterface>(
    arbiter: &mut Arbiter,
    config: &GameConfig,
    interface: &mut I,
) -> Result<()> {
    let snapshot = arbiter
        .start(&config.category, config.max_attempts)?
        .snapshot();
    interface.display_new_game(&snapshot, &config.category);
    Ok(())
}
