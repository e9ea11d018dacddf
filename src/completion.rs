//! Tab Completion Module
//!
//! Two-mode completion contract behind the `CompletionEngine` trait:
//! `expand` performs a greedy single completion, `candidates` returns
//! the full ordered list for the double-tab path. The bundled engine
//! completes the last whitespace-separated token against the file
//! system using glob matching.

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions};

/// A completion backend for the command line
pub trait CompletionEngine {
    /// Greedy single completion: the full line with the last token
    /// completed, or `None` when nothing changes.
    fn expand(&self, text: &str) -> Option<String>;

    /// All candidate replacements for the last token, ordered.
    fn candidates(&self, text: &str) -> Vec<String>;

    /// Follow a working-directory change. Engines with no notion of a
    /// directory ignore it.
    fn set_base_dir(&mut self, _dir: &Path) {}
}

/// Split a line into (head, last token). The head keeps its trailing
/// whitespace so `head + token` reassembles the line.
pub fn split_last_token(text: &str) -> (&str, &str) {
    match text.rfind(char::is_whitespace) {
        Some(idx) => {
            let boundary = idx + text[idx..].chars().next().map_or(1, |c| c.len_utf8());
            (&text[..boundary], &text[boundary..])
        }
        None => ("", text),
    }
}

/// Replace the last token of `text` with `candidate`
pub fn apply_candidate(text: &str, candidate: &str) -> String {
    let (head, _) = split_last_token(text);
    format!("{}{}", head, candidate)
}

/// Longest common prefix of the candidate set
pub fn longest_common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };
    let mut prefix = first.as_str();
    for candidate in &candidates[1..] {
        while !candidate.starts_with(prefix) {
            let cut = prefix
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            prefix = &prefix[..cut];
            if prefix.is_empty() {
                return String::new();
            }
        }
    }
    prefix.to_string()
}

/// File-system path completion rooted at a working directory
pub struct FsCompleter {
    base_dir: PathBuf,
    home_dir: Option<PathBuf>,
}

impl FsCompleter {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            home_dir: std::env::var("HOME").ok().map(PathBuf::from),
        }
    }

    /// Candidate replacements for a single token, sorted. Directories
    /// come back with a trailing `/`.
    fn complete_token(&self, token: &str) -> Vec<String> {
        if token.is_empty() {
            return Vec::new();
        }

        let (expanded, tilde_prefix) = self.expand_tilde(token);
        let pattern_path = if Path::new(&expanded).is_absolute() {
            PathBuf::from(format!("{}*", expanded))
        } else {
            self.base_dir.join(format!("{}*", expanded))
        };
        let Some(pattern) = pattern_path.to_str().map(str::to_string) else {
            return Vec::new();
        };

        // dotfiles stay hidden unless the token names them
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::default()
        };

        let Ok(paths) = glob_with(&pattern, options) else {
            return Vec::new();
        };

        let mut candidates: Vec<String> = paths
            .filter_map(Result::ok)
            .filter_map(|path| self.path_to_candidate(&path, tilde_prefix.as_deref()))
            .collect();
        candidates.sort();
        candidates.dedup();
        candidates
    }

    /// Expand a leading `~/` (or bare `~`) to the home directory,
    /// remembering that the candidate must be re-abbreviated.
    fn expand_tilde(&self, token: &str) -> (String, Option<String>) {
        if let Some(home) = &self.home_dir {
            if token == "~" || token.starts_with("~/") {
                let expanded = format!("{}{}", home.display(), &token[1..]);
                return (expanded, Some(home.display().to_string()));
            }
        }
        (token.to_string(), None)
    }

    /// Turn a matched path back into a token the way the user typed it:
    /// relative to the working directory, or `~`-abbreviated.
    fn path_to_candidate(&self, path: &Path, tilde_prefix: Option<&str>) -> Option<String> {
        let is_dir = path.is_dir();
        let mut candidate = match tilde_prefix {
            Some(home) => {
                let s = path.to_str()?;
                match s.strip_prefix(home) {
                    Some(rest) => format!("~{}", rest),
                    None => s.to_string(),
                }
            }
            None => match path.strip_prefix(&self.base_dir) {
                Ok(rel) => rel.to_str()?.to_string(),
                Err(_) => path.to_str()?.to_string(),
            },
        };
        if is_dir {
            candidate.push('/');
        }
        Some(candidate)
    }
}

impl CompletionEngine for FsCompleter {
    fn expand(&self, text: &str) -> Option<String> {
        let (head, token) = split_last_token(text);
        if token.is_empty() {
            return None;
        }

        let candidates = self.complete_token(token);
        let replacement = match candidates.len() {
            0 => return None,
            1 => candidates.into_iter().next()?,
            _ => {
                let prefix = longest_common_prefix(&candidates);
                if prefix.chars().count() <= token.chars().count() {
                    return None;
                }
                prefix
            }
        };

        let expanded = format!("{}{}", head, replacement);
        if expanded == text {
            None
        } else {
            Some(expanded)
        }
    }

    fn candidates(&self, text: &str) -> Vec<String> {
        let (_, token) = split_last_token(text);
        self.complete_token(token)
    }

    fn set_base_dir(&mut self, dir: &Path) {
        self.base_dir = dir.to_path_buf();
    }
}
