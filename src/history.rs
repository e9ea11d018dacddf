//! Command History Module
//!
//! Append-only command history with clamped navigation and prefix
//! recall. Each entry remembers the working directory it was submitted
//! from. The store is bounded and in-memory; a ring buffer keeps
//! eviction cheap.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A submitted command line plus the directory it was run from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub line: String,
    pub cwd: PathBuf,
}

/// Bounded command history with a navigation cursor
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<HistoryEntry>,
    max_size: usize,
    /// Navigation cursor into `entries`; `None` means "not navigating"
    position: Option<usize>,
    /// The unsubmitted line stashed when navigation starts
    stashed_line: Option<String>,
}

impl CommandHistory {
    /// Create a history bounded to `max_size` entries
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: max_size.max(1),
            position: None,
            stashed_line: None,
        }
    }

    /// Record a submitted line. Blank lines and duplicates of the most
    /// recent entry are ignored; navigation resets either way.
    pub fn record(&mut self, line: &str, cwd: &Path) {
        let line = line.trim();

        if !line.is_empty() && self.entries.back().map_or(true, |last| last.line != line) {
            if self.entries.len() >= self.max_size {
                self.entries.pop_front();
            }
            self.entries.push_back(HistoryEntry {
                line: line.to_string(),
                cwd: cwd.to_path_buf(),
            });
        }

        self.reset_navigation();
    }

    /// Step to the previous (older) entry. Holds at the oldest entry
    /// rather than wrapping.
    pub fn previous(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let idx = match self.position {
            None => self.entries.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.position = Some(idx);
        self.entries.get(idx).map(|e| e.line.clone())
    }

    /// Step to the next (newer) entry. Past the newest entry the
    /// stashed unsubmitted line comes back and navigation ends.
    pub fn next(&mut self) -> Option<String> {
        match self.position {
            None => None,
            Some(idx) if idx + 1 < self.entries.len() => {
                self.position = Some(idx + 1);
                self.entries.get(idx + 1).map(|e| e.line.clone())
            }
            Some(_) => {
                self.position = None;
                self.stashed_line.clone()
            }
        }
    }

    /// Search backward from the navigation cursor for the most recent
    /// entry starting with `prefix`, and move the cursor there.
    /// Repeated calls walk to successively older matches. An empty
    /// prefix matches every entry.
    pub fn recall_with_prefix(&mut self, prefix: &str) -> Option<String> {
        let start = self.position.unwrap_or(self.entries.len());
        for idx in (0..start).rev() {
            if self.entries[idx].line.starts_with(prefix) {
                self.position = Some(idx);
                return Some(self.entries[idx].line.clone());
            }
        }
        None
    }

    /// Stash the current unsubmitted line before navigation starts
    pub fn stash_line(&mut self, line: &str) {
        self.stashed_line = Some(line.to_string());
    }

    /// Current navigation cursor
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn reset_navigation(&mut self) {
        self.position = None;
        self.stashed_line = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.reset_navigation();
    }

    /// Entries most recent first, for the history dialog
    pub fn recent_lines(&self) -> Vec<String> {
        self.entries.iter().rev().map(|e| e.line.clone()).collect()
    }

    /// Full entries in chronological order
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recent entry
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(1000)
    }
}
