//! Folder Picker Module
//!
//! Modal directory-browsing dialog. Browses one directory level per
//! screen with `..` ascent and an explicit "choose here" action, and
//! returns the selected path or `None` on cancel. Selection processing
//! is a pure step so navigation is testable without a terminal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use inquire::{InquireError, Select};

const CHOOSE_HERE: &str = ". (choose this directory)";
const PARENT: &str = ".. (parent directory)";

/// A directory entry shown by the picker
#[derive(Debug, Clone)]
pub struct FolderEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of processing one selection
#[derive(Debug, Clone)]
pub enum PickOutcome {
    /// The browsed-to directory was chosen; the dialog is done
    Chosen(PathBuf),
    /// Descended into a subdirectory; keep browsing
    Descended(PathBuf),
    /// Went up to the parent; keep browsing
    Ascended,
    /// Selection could not be applied; keep browsing
    Error(String),
}

/// Modal directory-only browser
pub struct FolderPicker {
    current: PathBuf,
    show_hidden: bool,
}

impl FolderPicker {
    pub fn new(start_dir: PathBuf, show_hidden: bool) -> Self {
        let current = if start_dir.is_dir() {
            start_dir
        } else {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
        };
        Self {
            current,
            show_hidden,
        }
    }

    /// The directory being browsed
    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Subdirectories of the current directory, sorted by name
    pub fn read_entries(&self) -> io::Result<Vec<FolderEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.current)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            entries.push(FolderEntry { name, path });
        }

        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(entries)
    }

    /// Display strings for the selection list
    pub fn display_entries(&self, entries: &[FolderEntry]) -> Vec<String> {
        let mut display = vec![CHOOSE_HERE.to_string()];
        if self.current.parent().is_some() {
            display.push(PARENT.to_string());
        }
        for entry in entries {
            display.push(format!("{}/", entry.name));
        }
        display
    }

    /// Apply a selection made from `display_entries` output. Pure with
    /// respect to the terminal; only the browsed directory changes.
    pub fn process_selection(&mut self, selection: &str, entries: &[FolderEntry]) -> PickOutcome {
        if selection == CHOOSE_HERE {
            return PickOutcome::Chosen(self.current.clone());
        }

        if selection == PARENT {
            return match self.current.parent() {
                Some(parent) => {
                    self.current = parent.to_path_buf();
                    PickOutcome::Ascended
                }
                None => PickOutcome::Error("Already at the root".to_string()),
            };
        }

        let name = selection.trim_end_matches('/');
        match entries.iter().find(|e| e.name == name) {
            Some(entry) => {
                self.current = entry.path.clone();
                PickOutcome::Descended(entry.path.clone())
            }
            None => PickOutcome::Error(format!("No such directory: {}", name)),
        }
    }

    /// Run the modal dialog until a directory is chosen or the user
    /// cancels. Blocks the caller; the caller is responsible for
    /// suspending raw mode around it.
    pub fn present(&mut self) -> io::Result<Option<PathBuf>> {
        loop {
            let entries = self.read_entries()?;
            let display = self.display_entries(&entries);
            let title = self.current.display().to_string();

            let selection = Select::new(&title, display)
                .with_page_size(15)
                .with_help_message("↑↓ navigate, type to filter, Enter to select, Esc to cancel")
                .prompt();

            match selection {
                Ok(selected) => match self.process_selection(&selected, &entries) {
                    PickOutcome::Chosen(path) => return Ok(Some(path)),
                    PickOutcome::Descended(_) | PickOutcome::Ascended => {}
                    PickOutcome::Error(_) => {}
                },
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(None);
                }
                Err(e) => {
                    return Err(io::Error::new(io::ErrorKind::Other, e));
                }
            }
        }
    }
}
