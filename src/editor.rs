//! Input Line Editor Module
//!
//! Single-line editable text buffer with cursor management, a scroll
//! offset for long lines, and an optional selection range. All cursor
//! positions are byte indices on UTF-8 character boundaries; display
//! math is done in characters.

use crate::utils::{byte_index_of_char, char_index_of_byte, char_len};

/// Cursor movement kinds understood by the editor
#[derive(Debug, Clone, Copy)]
pub enum Movement {
    Left,
    Right,
    WordLeft,
    WordRight,
    Home,
    End,
}

/// Single-line text buffer with cursor, scroll offset and selection
#[derive(Debug, Clone, Default)]
pub struct EditLine {
    text: String,
    /// Byte index of the cursor, always on a char boundary
    cursor: usize,
    /// First visible character (scroll offset)
    left_pos: usize,
    /// Active selection as a byte range, start < end
    selection: Option<(usize, usize)>,
    /// Selection anchor while shift-extending
    anchor: Option<usize>,
}

impl EditLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the buffer contents
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte position of the cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position as a character index
    pub fn cursor_char(&self) -> usize {
        char_index_of_byte(&self.text, self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole buffer; cursor moves to the end, scroll and
    /// selection are reset.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
        self.left_pos = 0;
        self.selection = None;
        self.anchor = None;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.drop_selection();
    }

    /// Insert a string at the cursor
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.drop_selection();
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        if let Some((prev, _)) = self.text[..self.cursor].char_indices().last() {
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
        self.drop_selection();
    }

    /// Delete the character at the cursor
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            let end = self.cursor + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
        self.drop_selection();
    }

    /// Delete the word before the cursor: trailing whitespace first,
    /// then the word itself.
    pub fn delete_word_backward(&mut self) {
        let start = self.word_left_boundary();
        if start < self.cursor {
            self.text.drain(start..self.cursor);
            self.cursor = start;
        }
        self.drop_selection();
    }

    /// Delete from the cursor to the end of the line
    pub fn kill_to_end(&mut self) {
        self.text.truncate(self.cursor);
        self.drop_selection();
    }

    /// Move the cursor; with `select` the selection is anchored at the
    /// old position and extended, without it any selection survives
    /// only if the caller keeps it (see `drop_selection`).
    pub fn move_cursor(&mut self, movement: Movement, select: bool) {
        if select && self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
        if !select {
            self.anchor = None;
        }

        self.cursor = match movement {
            Movement::Left => self.prev_char_boundary(),
            Movement::Right => self.next_char_boundary(),
            Movement::WordLeft => self.word_left_boundary(),
            Movement::WordRight => self.word_right_boundary(),
            Movement::Home => 0,
            Movement::End => self.text.len(),
        };

        if let Some(anchor) = self.anchor {
            if anchor == self.cursor {
                self.selection = None;
            } else {
                self.selection = Some((anchor.min(self.cursor), anchor.max(self.cursor)));
            }
        }
    }

    /// Place the cursor at the `n`-th character (clamped)
    pub fn set_cursor_to_char(&mut self, n: usize) {
        self.cursor = byte_index_of_char(&self.text, n);
    }

    /// Current selection as a byte range
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Selected text, if any
    pub fn selected_text(&self) -> Option<&str> {
        self.selection.map(|(s, e)| &self.text[s..e])
    }

    /// Select an explicit byte range; out-of-range ends are clamped
    pub fn select(&mut self, start: usize, end: usize) {
        let start = start.min(self.text.len());
        let end = end.min(self.text.len());
        if start < end {
            self.selection = Some((start, end));
        } else {
            self.selection = None;
        }
        self.anchor = None;
    }

    /// Drop the selection without touching the text
    pub fn drop_selection(&mut self) {
        self.selection = None;
        self.anchor = None;
    }

    /// Remove the selected text; cursor lands at the selection start.
    /// Returns whether anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        match self.selection.take() {
            Some((start, end)) => {
                self.text.drain(start..end);
                self.cursor = start;
                self.anchor = None;
                true
            }
            None => false,
        }
    }

    /// First visible character index
    pub fn left_pos(&self) -> usize {
        self.left_pos
    }

    pub fn set_left_pos(&mut self, left_pos: usize) {
        self.left_pos = left_pos;
    }

    /// Scroll so the cursor falls inside a window of `width` characters,
    /// then return the visible text and the cursor column within it.
    pub fn window(&mut self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let cursor_char = self.cursor_char();
        if cursor_char < self.left_pos {
            self.left_pos = cursor_char;
        } else if cursor_char >= self.left_pos + width {
            self.left_pos = cursor_char + 1 - width;
        }
        let visible: String = self
            .text
            .chars()
            .skip(self.left_pos)
            .take(width)
            .collect();
        (visible, cursor_char - self.left_pos)
    }

    /// Selection as a character range, for display
    pub fn selection_chars(&self) -> Option<(usize, usize)> {
        self.selection.map(|(s, e)| {
            (
                char_index_of_byte(&self.text, s),
                char_index_of_byte(&self.text, e),
            )
        })
    }

    /// Number of characters in the buffer
    pub fn char_count(&self) -> usize {
        char_len(&self.text)
    }

    fn prev_char_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_char_boundary(&self) -> usize {
        match self.text[self.cursor..].chars().next() {
            Some(ch) => self.cursor + ch.len_utf8(),
            None => self.cursor,
        }
    }

    fn word_left_boundary(&self) -> usize {
        let before = &self.text[..self.cursor];
        let mut chars: Vec<(usize, char)> = before.char_indices().collect();
        while let Some(&(_, ch)) = chars.last() {
            if ch.is_whitespace() {
                chars.pop();
            } else {
                break;
            }
        }
        while let Some(&(_, ch)) = chars.last() {
            if !ch.is_whitespace() {
                chars.pop();
            } else {
                break;
            }
        }
        chars.last().map(|&(i, ch)| i + ch.len_utf8()).unwrap_or(0)
    }

    fn word_right_boundary(&self) -> usize {
        let mut pos = self.cursor;
        let rest = &self.text[self.cursor..];
        let mut iter = rest.char_indices().peekable();
        // skip the current word, then the whitespace after it
        while let Some(&(i, ch)) = iter.peek() {
            if ch.is_whitespace() {
                break;
            }
            pos = self.cursor + i + ch.len_utf8();
            iter.next();
        }
        while let Some(&(i, ch)) = iter.peek() {
            if !ch.is_whitespace() {
                break;
            }
            pos = self.cursor + i + ch.len_utf8();
            iter.next();
        }
        pos
    }
}
