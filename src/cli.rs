use crate::game_state::{GameConfig, GameInterface, UserAction};
use crate::scoring::GuessResult;
use crate::session::{Outcome, SessionSnapshot};
use crate::stats::GameStats;
use crate::wordbank::ANY_CATEGORY;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

pub const HINT_COMMAND: &str = "/hint";
pub const NEW_GAME_COMMAND: &str = "/next";
pub const EXIT_COMMAND: &str = "/exit";

/// Hidden-word guessing game
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a word catalog (`WORD` or `WORD;CATEGORY` per line)
    #[arg(short = 'i', long = "input")]
    pub words_path: Option<PathBuf>,

    /// Category the secret is drawn from
    #[arg(short, long, default_value = ANY_CATEGORY)]
    pub category: String,

    /// Number of attempts per game
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub attempts: u32,

    /// Shared library providing the native game evaluator
    #[arg(long = "native-lib", env = "WORDLE_NATIVE_LIB")]
    pub native_lib: Option<PathBuf>,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Where win/loss statistics are kept
    #[arg(long = "stats", conflicts_with = "no_stats")]
    pub stats_path: Option<PathBuf>,

    /// Do not read or write statistics
    #[arg(long)]
    pub no_stats: bool,

    /// Print the catalog's categories and exit
    #[arg(long)]
    pub list_categories: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        let category = self.category.trim();
        GameConfig {
            category: if category.is_empty() {
                ANY_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            max_attempts: self.attempts,
        }
    }
}

pub fn parse_action(input: &str) -> Option<UserAction> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.to_lowercase().as_str() {
        HINT_COMMAND => Some(UserAction::Hint),
        NEW_GAME_COMMAND => Some(UserAction::NewGame),
        EXIT_COMMAND => Some(UserAction::Exit),
        _ => Some(UserAction::Guess(input.to_ascii_uppercase())),
    }
}

pub fn lives_line(snapshot: &SessionSnapshot) -> String {
    let hearts: String = (0..snapshot.max_attempts)
        .map(|i| if i < snapshot.effective_lives { '♥' } else { '·' })
        .collect();
    format!(
        "Lives: {hearts} ({}/{})",
        snapshot.effective_lives, snapshot.max_attempts
    )
}

pub fn format_stats(stats: &GameStats) -> String {
    format!(
        "Wins: {} | Losses: {} | Win rate: {:.1}%",
        stats.wins,
        stats.losses,
        stats.win_rate()
    )
}

pub fn display_new_game(snapshot: &SessionSnapshot, category: &str) {
    println!(
        "\nNew game started: {} letters, category {category}, {} scoring.",
        snapshot.word_length, snapshot.backend_mode
    );
    println!("Word: {}", snapshot.mask);
    println!("{}", lives_line(snapshot));
}

pub fn display_guess_result(result: &GuessResult, snapshot: &SessionSnapshot) {
    let letters: Vec<String> = result.guess().chars().map(|c| c.to_string()).collect();
    let marks: Vec<String> = result
        .statuses()
        .iter()
        .map(|s| s.as_char().to_string())
        .collect();
    println!("{}", letters.join(" "));
    println!("{}", marks.join(" "));
    println!("{}", lives_line(snapshot));
}

pub fn display_hint(index: usize, snapshot: &SessionSnapshot) {
    println!("Hint: letter {} revealed. Word: {}", index + 1, snapshot.mask);
    println!("{}", lives_line(snapshot));
}

pub fn display_notice(message: &str) {
    println!("{message}");
}

/// Closing line of a finished game. A loss is worded in lives so it also
/// covers games ended by hints with attempts still on the counter.
pub fn game_over_message(snapshot: &SessionSnapshot) -> String {
    let secret = snapshot.secret.as_deref().unwrap_or("?");
    match snapshot.outcome {
        Outcome::Won => format!("You won! The word was {secret}."),
        Outcome::Lost | Outcome::Ongoing => format!("No lives left. The word was {secret}."),
    }
}

pub fn display_game_over(snapshot: &SessionSnapshot, stats: &GameStats) {
    println!("{}", game_over_message(snapshot));
    println!("{}", format_stats(stats));
    println!("Type {NEW_GAME_COMMAND} to play again or {EXIT_COMMAND} to quit.");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the `GameInterface` trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
    word_length: usize,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            word_length: 0,
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_new_game(&mut self, snapshot: &SessionSnapshot, category: &str) {
        self.word_length = snapshot.word_length;
        display_new_game(snapshot, category);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        println!(
            "\nEnter your guess ({} letters, {HINT_COMMAND}, {NEW_GAME_COMMAND} or {EXIT_COMMAND}):",
            self.word_length
        );
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            // End of input behaves like an explicit exit.
            Ok(0) => Some(UserAction::Exit),
            Ok(_) => parse_action(&input),
            Err(e) => {
                log::error!("Failed to read input: {e}");
                Some(UserAction::Exit)
            }
        }
    }

    fn display_guess_result(&mut self, result: &GuessResult, snapshot: &SessionSnapshot) {
        display_guess_result(result, snapshot);
    }

    fn display_hint(&mut self, index: usize, snapshot: &SessionSnapshot) {
        display_hint(index, snapshot);
    }

    fn display_notice(&mut self, message: &str) {
        display_notice(message);
    }

    fn display_game_over(&mut self, snapshot: &SessionSnapshot, stats: &GameStats) {
        display_game_over(snapshot, stats);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
