//! Command Line Configuration Module
//!
//! Settings for the command-line widget and its dialogs: the prompt
//! template, history bounds, selection behavior, autocomplete and
//! colors. Persisted as pretty JSON under the user config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

/// Configuration for the command line widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdlineConfig {
    /// Prompt template with `$`-escapes
    pub prompt_format: String,
    /// Expand `prompt_format` instead of the built-in default
    pub use_prompt_format: bool,
    pub max_history_size: usize,
    /// Esc also resets the history navigation position
    pub history_reset_on_discard: bool,
    /// Selection survives unmarking keys
    pub persistent_selection: bool,
    /// Backspace/Delete remove an active selection
    pub delete_removes_selection: bool,
    pub autocomplete: bool,
    /// Show hidden directories in the folder picker
    pub show_hidden_folders: bool,
    pub prompt_color: String,
    pub text_color: String,
    pub selection_color: String,
}

impl Default for CmdlineConfig {
    fn default() -> Self {
        Self {
            prompt_format: "$p$# ".to_string(),
            use_prompt_format: false,
            max_history_size: 1000,
            history_reset_on_discard: false,
            persistent_selection: false,
            delete_removes_selection: true,
            autocomplete: true,
            show_hidden_folders: false,
            prompt_color: "DarkCyan".to_string(),
            text_color: "White".to_string(),
            selection_color: "DarkBlue".to_string(),
        }
    }
}

impl CmdlineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location under the user's home
    pub fn default_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => Path::new(&home).join(".config/farline/config.json"),
            Err(_) => PathBuf::from("farline-config.json"),
        }
    }

    /// Load a config from a JSON file
    pub fn load(path: &Path) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Load a config, falling back to defaults when the file is
    /// missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Persist the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, data)
    }

    /// The prompt template in effect
    pub fn effective_prompt_format(&self) -> &str {
        if self.use_prompt_format {
            &self.prompt_format
        } else {
            "$p$# "
        }
    }

    pub fn get_prompt_color(&self) -> Color {
        color_by_name(&self.prompt_color).unwrap_or(Color::DarkCyan)
    }

    pub fn get_text_color(&self) -> Color {
        color_by_name(&self.text_color).unwrap_or(Color::White)
    }

    pub fn get_selection_color(&self) -> Color {
        color_by_name(&self.selection_color).unwrap_or(Color::DarkBlue)
    }

    /// Configuration summary lines for display
    pub fn get_summary(&self) -> Vec<String> {
        vec![
            "Prompt".to_string(),
            format!("  Template: {:?}", self.prompt_format),
            format!("  Use template: {}", self.use_prompt_format),
            "".to_string(),
            "History".to_string(),
            format!("  Max size: {}", self.max_history_size),
            format!("  Reset position on Esc: {}", self.history_reset_on_discard),
            "".to_string(),
            "Editing".to_string(),
            format!("  Persistent selection: {}", self.persistent_selection),
            format!("  Delete removes selection: {}", self.delete_removes_selection),
            format!("  Autocomplete: {}", self.autocomplete),
            "".to_string(),
            "Dialogs".to_string(),
            format!("  Show hidden folders: {}", self.show_hidden_folders),
            "".to_string(),
            "Colors".to_string(),
            format!("  Prompt: {}", self.prompt_color),
            format!("  Text: {}", self.text_color),
            format!("  Selection: {}", self.selection_color),
        ]
    }
}

fn color_by_name(name: &str) -> Option<Color> {
    match name {
        "Black" => Some(Color::Black),
        "DarkGrey" => Some(Color::DarkGrey),
        "Red" => Some(Color::Red),
        "DarkRed" => Some(Color::DarkRed),
        "Green" => Some(Color::Green),
        "DarkGreen" => Some(Color::DarkGreen),
        "Yellow" => Some(Color::Yellow),
        "DarkYellow" => Some(Color::DarkYellow),
        "Blue" => Some(Color::Blue),
        "DarkBlue" => Some(Color::DarkBlue),
        "Magenta" => Some(Color::Magenta),
        "DarkMagenta" => Some(Color::DarkMagenta),
        "Cyan" => Some(Color::Cyan),
        "DarkCyan" => Some(Color::DarkCyan),
        "White" => Some(Color::White),
        "Grey" => Some(Color::Grey),
        _ => None,
    }
}
