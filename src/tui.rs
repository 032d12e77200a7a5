//! TUI (Terminal User Interface) frontend built on Ratatui.
//!
//! `TuiInterface` owns the terminal and implements [`GameInterface`], so the
//! same `game_loop` drives it as drives the line-based CLI.
//!
//! # State Machine
//! - `EnteringGuess` → (session ends) → `GameOver` → (N) → `EnteringGuess`

use crate::cli::{format_stats, game_over_message};
use crate::game_state::{GameInterface, UserAction};
use crate::scoring::{GuessResult, LetterStatus};
use crate::session::{Outcome, SessionSnapshot};
use crate::stats::GameStats;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const LIVES_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Debug)]
enum TileState {
    Empty,
    Entered,
    Scored(LetterStatus),
}

impl TileState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Empty | Self::Entered => (Color::DarkGray, Color::White),
            Self::Scored(LetterStatus::Correct) => (Color::Green, Color::Black),
            Self::Scored(LetterStatus::Present) => (Color::Yellow, Color::Black),
            Self::Scored(LetterStatus::Absent) => (Color::Gray, Color::White),
        }
    }
}

#[derive(Debug)]
struct GuessRow {
    tiles: Vec<(char, TileState)>,
}

impl GuessRow {
    fn from_result(result: &GuessResult) -> Self {
        Self {
            tiles: result
                .letters()
                .map(|(c, status)| (c, TileState::Scored(status)))
                .collect(),
        }
    }

    fn from_input(input: &str, word_length: usize) -> Self {
        let mut tiles: Vec<(char, TileState)> =
            input.chars().map(|c| (c, TileState::Entered)).collect();
        tiles.resize(word_length.max(tiles.len()), (' ', TileState::Empty));
        Self { tiles }
    }
}

#[derive(Debug, PartialEq)]
enum TuiState {
    EnteringGuess,
    GameOver,
}

/// Result of feeding one key to the guess editor.
#[derive(Debug, PartialEq)]
enum KeyOutcome {
    Edited,
    Rejected(String),
    Action(UserAction),
    Ignored,
}

/// Applies a key press to the guess being typed.
fn apply_guess_key(input: &mut String, word_length: usize, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL) {
        return KeyOutcome::Ignored;
    }
    match key.code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() && input.len() < word_length => {
            input.push(c.to_ascii_uppercase());
            KeyOutcome::Edited
        }
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            KeyOutcome::Rejected(format!("The word has only {word_length} letters"))
        }
        KeyCode::Char(c) => KeyOutcome::Rejected(format!("Only letters are allowed! ('{c}' is not a letter)")),
        KeyCode::Backspace if !input.is_empty() => {
            input.pop();
            KeyOutcome::Edited
        }
        KeyCode::Enter if input.len() == word_length => {
            KeyOutcome::Action(UserAction::Guess(std::mem::take(input)))
        }
        KeyCode::Enter => KeyOutcome::Rejected(format!("Guess must be exactly {word_length} letters!")),
        KeyCode::Tab => KeyOutcome::Action(UserAction::Hint),
        KeyCode::Esc => KeyOutcome::Action(UserAction::Exit),
        _ => KeyOutcome::Ignored,
    }
}

fn game_over_key(key: KeyEvent) -> Option<UserAction> {
    match key.code {
        KeyCode::Char('n' | 'N') => Some(UserAction::NewGame),
        KeyCode::Esc => Some(UserAction::Exit),
        _ => None,
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    guesses: &'a [GuessRow],
    current_input: &'a str,
    state: &'a TuiState,
    snapshot: Option<&'a SessionSnapshot>,
    category: &'a str,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Full-screen game interface.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    guesses: Vec<GuessRow>,
    current_input: String,
    state: TuiState,
    snapshot: Option<SessionSnapshot>,
    category: String,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            guesses: Vec::new(),
            current_input: String::new(),
            state: TuiState::EnteringGuess,
            snapshot: None,
            category: String::new(),
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn word_length(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.word_length)
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            guesses: &self.guesses,
            current_input: &self.current_input,
            state: &self.state,
            snapshot: self.snapshot.as_ref(),
            category: &self.category,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(8),    // Game board
                Constraint::Length(7), // Info panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORDLE")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default().title("Guesses").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let word_length = ctx.snapshot.map_or(0, |s| s.word_length);
        let available_rows = (inner.height / ROW_SPACING) as usize;
        let showing_input = *ctx.state == TuiState::EnteringGuess && word_length > 0;
        let rows_needed = ctx.guesses.len() + usize::from(showing_input);
        // Keep the most recent rows visible on small terminals
        let skip = rows_needed.saturating_sub(available_rows);

        let mut row_index = 0;
        for guess in ctx.guesses.iter().skip(skip) {
            Self::render_tiles(f, inner, row_index, &guess.tiles);
            row_index += 1;
        }
        if showing_input {
            let row = GuessRow::from_input(ctx.current_input, word_length);
            Self::render_tiles(f, inner, row_index, &row.tiles);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_tiles(f: &mut Frame, area: Rect, row_index: usize, tiles: &[(char, TileState)]) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        for (letter, state) in tiles {
            let (bg, fg) = state.colors();
            spans.push(Span::styled(
                format!(" {letter} "),
                Style::default().fg(fg).bg(bg),
            ));
            spans.push(Span::raw(" "));
        }

        f.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(snapshot) = ctx.snapshot {
            lines.push(Line::from(vec![
                Span::styled("Word: ", HEADER_STYLE),
                Span::raw(snapshot.secret.clone().unwrap_or_else(|| snapshot.mask.clone())),
                Span::raw(format!(
                    "   Category: {}   Scoring: {}",
                    ctx.category, snapshot.backend_mode
                )),
            ]));
            let hearts: String = (0..snapshot.max_attempts)
                .map(|i| if i < snapshot.effective_lives { '♥' } else { '·' })
                .collect();
            lines.push(Line::from(vec![
                Span::styled("Lives: ", HEADER_STYLE),
                Span::styled(hearts, LIVES_STYLE),
                Span::raw(format!(
                    "  ({} attempts, {} hints)",
                    snapshot.attempts_remaining, snapshot.hints_taken
                )),
            ]));
        }

        if !ctx.message.is_empty() {
            let style = match ctx.snapshot.map(|s| s.outcome) {
                Some(Outcome::Won) => SUCCESS_STYLE,
                Some(Outcome::Lost) => ERROR_STYLE,
                _ => MESSAGE_STYLE,
            };
            lines.push(Line::from(vec![Span::styled(ctx.message, style)]));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
        let text = match state {
            TuiState::EnteringGuess => "Type your guess | ENTER: Submit | TAB: Hint (costs a life) | ESC: Quit",
            TuiState::GameOver => "N: New Game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    /// Waits for one key press and turns it into an action, if any.
    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }
        debug_log!("handle_input() - key {:?} in {:?}", key.code, self.state);

        match self.state {
            TuiState::EnteringGuess => {
                let word_length = self.word_length();
                match apply_guess_key(&mut self.current_input, word_length, key) {
                    KeyOutcome::Edited => self.error_message.clear(),
                    KeyOutcome::Rejected(message) => self.error_message = message,
                    KeyOutcome::Action(action) => {
                        self.error_message.clear();
                        return Ok(Some(action));
                    }
                    KeyOutcome::Ignored => {}
                }
                Ok(None)
            }
            TuiState::GameOver => Ok(game_over_key(key)),
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_new_game(&mut self, snapshot: &SessionSnapshot, category: &str) {
        self.guesses.clear();
        self.current_input.clear();
        self.error_message.clear();
        self.snapshot = Some(snapshot.clone());
        self.category = category.to_string();
        self.state = TuiState::EnteringGuess;
        self.message = format!("New game: guess the {}-letter word.", snapshot.word_length);
        self.status = format!("{} lives", snapshot.effective_lives);
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Terminal input error: {e}");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_guess_result(&mut self, result: &GuessResult, snapshot: &SessionSnapshot) {
        self.guesses.push(GuessRow::from_result(result));
        self.snapshot = Some(snapshot.clone());
        self.message.clear();
        self.status = format!("{} → {}", result.guess(), result);
        self.draw_or_log();
    }

    fn display_hint(&mut self, index: usize, snapshot: &SessionSnapshot) {
        self.snapshot = Some(snapshot.clone());
        self.message = format!("Letter {} revealed.", index + 1);
        self.status = format!("{} lives left", snapshot.effective_lives);
        self.draw_or_log();
    }

    fn display_notice(&mut self, message: &str) {
        self.error_message = message.to_string();
        self.draw_or_log();
    }

    fn display_game_over(&mut self, snapshot: &SessionSnapshot, stats: &GameStats) {
        self.snapshot = Some(snapshot.clone());
        self.state = TuiState::GameOver;
        self.message = game_over_message(snapshot);
        self.status = format_stats(stats);
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
