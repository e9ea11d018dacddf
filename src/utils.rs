//! Display Utilities Module
//!
//! Small text helpers shared by the command line and its dialogs:
//! path truncation for the prompt cell budget and character-based
//! width math for the single-line editor.

/// Truncate a path string to fit within `max_cells` display cells.
///
/// Long paths lose their *front*, keeping the most specific trailing
/// components visible, with a leading ellipsis marking the cut.
pub fn trunc_path_str(path: &str, max_cells: usize) -> String {
    let len = char_len(path);
    if len <= max_cells {
        return path.to_string();
    }

    if max_cells == 0 {
        return String::new();
    }

    let keep = max_cells - 1;
    let tail: String = path.chars().skip(len - keep).collect();
    format!("…{}", tail)
}

/// Number of characters in a string (not bytes).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `n`-th character, clamped to the string length.
pub fn byte_index_of_char(s: &str, n: usize) -> usize {
    s.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Character index of a byte position (assumed to lie on a boundary).
pub fn char_index_of_byte(s: &str, byte: usize) -> usize {
    s[..byte.min(s.len())].chars().count()
}
