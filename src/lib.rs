// Library interface for wordle-game
// The binary and the integration tests both go through these modules

pub mod arbiter;
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod game_state;
pub mod hint;
pub mod logging;
pub mod native;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use arbiter::Arbiter;
pub use error::{GameError, Result};
pub use evaluator::{Capabilities, Capability, EvaluatorError, ExternalEvaluator};
pub use game_state::{GameConfig, GameInterface, UserAction, game_loop};
pub use scoring::{GuessResult, LetterStatus, score};
pub use session::{BackendMode, Outcome, Session, SessionSnapshot};
pub use wordbank::{Catalog, load_catalog_from_file, load_catalog_from_str};
