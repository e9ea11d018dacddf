//! Command Prefix Module
//!
//! Parses the in-line command prefixes the command line recognizes
//! before handing a submitted line to plugin dispatch or execution:
//! `far:config`, `far:about`, `far:edit[:| ]<path>`, `far:view[:| ]<path>`,
//! `edit:<path>` and `view:<path>`. Anything else passes through
//! untouched. Matching is case-sensitive.

/// A recognized built-in command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarCommand {
    /// `far:config`
    Config,
    /// `far:about`
    About,
    /// Open the editor; `None` means a new unnamed file
    Edit(Option<String>),
    /// Open the viewer; `None` means the prefix was consumed with
    /// nothing to open
    View(Option<String>),
}

impl FarCommand {
    /// Parse a submitted line. `None` means no prefix matched and the
    /// line belongs to plugin dispatch / execution.
    pub fn parse(line: &str) -> Option<FarCommand> {
        let line = line.trim();

        let is_far = line.starts_with("far:");
        let is_edit = !is_far && line.starts_with("edit:");
        let is_view = !is_far && !is_edit && line.starts_with("view:");
        if !is_far && !is_edit && !is_view {
            return None;
        }

        if is_far && line == "far:config" {
            return Some(FarCommand::Config);
        }
        if is_far && line == "far:about" {
            return Some(FarCommand::About);
        }

        let edit_arg_at = if is_edit {
            Some("edit:".len())
        } else if is_far
            && (line.starts_with("far:edit:") || line.starts_with("far:edit ") || line == "far:edit")
        {
            Some("far:edit:".len())
        } else {
            None
        };
        if let Some(at) = edit_arg_at {
            return Some(FarCommand::Edit(path_arg(line, at)));
        }

        // bare "far:view" is deliberately not recognized
        let view_arg_at = if is_view {
            Some("view:".len())
        } else if is_far && (line.starts_with("far:view:") || line.starts_with("far:view ")) {
            Some("far:view:".len())
        } else {
            None
        };
        if let Some(at) = view_arg_at {
            return Some(FarCommand::View(path_arg(line, at)));
        }

        None
    }
}

/// The path argument starting at byte `at`, with leading blanks skipped
fn path_arg(line: &str, at: usize) -> Option<String> {
    if at >= line.len() {
        return None;
    }
    let arg = line[at..].trim_start_matches([' ', '\t']);
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}
