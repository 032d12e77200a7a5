use crate::debug_log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STATS_DIR: &str = "wordle-game";
const STATS_FILE: &str = "stats.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub wins: u32,
    pub losses: u32,
}

impl GameStats {
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    /// Percentage of games won, 0.0 before the first game.
    pub fn win_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.total()) * 100.0
        }
    }
}

/// Default location of the stats file, under the platform data directory.
pub fn default_stats_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(STATS_DIR).join(STATS_FILE))
}

/// Win/loss counters persisted as JSON.
#[derive(Debug)]
pub struct StatsStore {
    path: Option<PathBuf>,
    data: GameStats,
}

impl StatsStore {
    /// Loads stats from `path`. A missing or unreadable file starts from zero.
    pub fn open(path: PathBuf) -> Self {
        let data = match read_stats(&path) {
            Ok(Some(data)) => data,
            Ok(None) => GameStats::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable stats file {}: {e}", path.display());
                GameStats::default()
            }
        };
        debug_log!("Stats loaded from {}: {:?}", path.display(), data);
        Self {
            path: Some(path),
            data,
        }
    }

    /// A store that keeps counts in memory only.
    pub fn disabled() -> Self {
        Self {
            path: None,
            data: GameStats::default(),
        }
    }

    pub fn stats(&self) -> GameStats {
        self.data
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&mut self, won: bool) {
        if won {
            self.data.wins += 1;
        } else {
            self.data.losses += 1;
        }
        if let Err(e) = self.save() {
            log::warn!("Failed to save stats: {e}");
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, json)
    }
}

fn read_stats(path: &Path) -> io::Result<Option<GameStats>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let data = serde_json::from_str(&text)?;
    Ok(Some(data))
}
