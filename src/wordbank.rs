use crate::debug_log;
use crate::error::{GameError, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/words.txt");

/// Pseudo-category that selects the whole catalog.
pub const ANY_CATEGORY: &str = "ANY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    /// `None` for plain `WORD` lines.
    pub category: Option<String>,
}

/// Read-only list of words loaded once at startup and shared by every session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<WordEntry>,
    categories: BTreeSet<String>,
    words: HashSet<String>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<WordEntry>) -> Self {
        let categories = entries
            .iter()
            .filter_map(|e| e.category.clone())
            .collect();
        let words = entries.iter().map(|e| e.text.clone()).collect();
        Self {
            entries,
            categories,
            words,
        }
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct categories in lexicographic order, or just `ANY` when the
    /// catalog has no tagged entries.
    pub fn categories(&self) -> Vec<String> {
        if self.categories.is_empty() {
            return vec![ANY_CATEGORY.to_string()];
        }
        self.categories.iter().cloned().collect()
    }

    /// Words tagged with `category`. `ANY` or an empty name returns every word.
    /// An unknown category yields an empty list; callers fall back to
    /// [`Catalog::all_words`].
    pub fn words_in(&self, category: &str) -> Vec<String> {
        let category = category.trim();
        if category.is_empty() || category == ANY_CATEGORY {
            return self.all_words();
        }
        self.entries
            .iter()
            .filter(|e| e.category.as_deref() == Some(category))
            .map(|e| e.text.clone())
            .collect()
    }

    pub fn all_words(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

fn parse_line(line: &str) -> Option<WordEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, category) = match line.split_once(';') {
        Some((word, category)) => (word, Some(category.trim())),
        None => (line, None),
    };
    let text = word.trim().to_uppercase();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphabetic()) {
        debug_log!("Skipping catalog line with non-letter word: {:?}", line);
        return None;
    }
    Some(WordEntry {
        text,
        category: category.filter(|c| !c.is_empty()).map(str::to_string),
    })
}

/// Parses `WORD` / `WORD;CATEGORY` lines. Blank and malformed lines are skipped.
pub fn load_catalog_from_str(data: &str) -> Catalog {
    Catalog::from_entries(data.lines().filter_map(parse_line).collect())
}

/// An empty file loads as an empty catalog; only an unreadable one is an error.
pub fn load_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| GameError::CatalogLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = load_catalog_from_str(&data);
    debug_log!(
        "Loaded {} catalog entries from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
