// Conditional logging macros - only active in debug builds.
// Warnings and errors go through `log::warn!`/`log::error!` directly so they
// survive release builds.

use env_logger::Target;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const LOG_DIR: &str = "wordle-game";
const LOG_FILE: &str = "wordle-game.log";

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Level used when `RUST_LOG` is not set, from the number of `-v` flags.
pub fn level_for_verbosity(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn builder(verbosity: u8) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for_verbosity(verbosity));
    builder.parse_default_env();
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {:<5} {}] {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}

/// Installs the stderr logger. `RUST_LOG` overrides `verbosity`.
pub fn init(verbosity: u8) {
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder(verbosity).try_init();
}

/// Log file used while the TUI owns the terminal.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(LOG_DIR).join(LOG_FILE))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn file_builder(verbosity: u8, path: &Path) -> io::Result<env_logger::Builder> {
    let file = open_log_file(path)?;
    let mut builder = builder(verbosity);
    builder.target(Target::Pipe(Box::new(file)));
    Ok(builder)
}

/// Installs a logger that appends to `path` instead of writing to stderr.
pub fn init_to_file(verbosity: u8, path: &Path) -> io::Result<()> {
    let _ = file_builder(verbosity, path)?.try_init();
    Ok(())
}

/// Logging for the full-screen interface. Nothing may reach stderr while the
/// alternate screen is up, so when no log file can be opened logging stays off.
pub fn init_for_tui(verbosity: u8) {
    let Some(path) = default_log_path() else {
        return;
    };
    if let Err(e) = init_to_file(verbosity, &path) {
        // Printed before the TUI starts, so it does not corrupt the screen.
        eprintln!("Logging disabled: cannot open {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), log::LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), log::LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), log::LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), log::LevelFilter::Trace);
    }

    #[test]
    fn test_file_logger_writes_to_file_only() {
        use log::Log;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("game.log");
        let logger = file_builder(0, &path).unwrap().build();

        logger.log(
            &log::Record::builder()
                .args(format_args!("native secret rejected"))
                .level(log::Level::Warn)
                .target("wordle_game::arbiter")
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .args(format_args!("below the filter"))
                .level(log::Level::Debug)
                .target("wordle_game::arbiter")
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("WARN  wordle_game::arbiter] native secret rejected"));
        assert!(!contents.contains("below the filter"));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        fs::write(&path, "earlier run\n").unwrap();
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "later run").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier run\nlater run\n");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
