//! Rope-based text buffer addressed by (line, rune-column) positions.
//!
//! Columns count Unicode scalar values, never bytes; the rope maps those
//! to storage. The buffer exposes primitive edits only — cursor policy,
//! clipboards and undo belong to the editor state layer.

use ropey::Rope;

pub mod motion;

/// A position inside a buffer: line index plus rune offset within the line.
/// `col == line_len` addresses the slot just past the last rune (valid for
/// insertion and for the rest position after a deletion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
}

/// Character class used by word motions. Newlines count as whitespace so
/// word scans cross line boundaries naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuneClass {
    Whitespace,
    Word,
    Punctuation,
}

pub fn rune_class(r: char) -> RuneClass {
    if r.is_whitespace() {
        RuneClass::Whitespace
    } else if r.is_alphanumeric() || r == '_' {
        RuneClass::Word
    } else {
        RuneClass::Punctuation
    }
}

/// Text buffer backed by a `ropey::Rope`.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    pub fn from_str(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    /// Total runes, newlines included.
    pub fn len_runes(&self) -> usize {
        self.rope.len_chars()
    }

    /// Logical line count: a trailing newline does not open a final empty
    /// line (vi convention). An empty buffer still has one line.
    pub fn line_count(&self) -> usize {
        let raw = self.rope.len_lines();
        if self.rope.len_chars() > 0 && self.rope.char(self.rope.len_chars() - 1) == '\n' {
            (raw - 1).max(1)
        } else {
            raw
        }
    }

    /// Requested line without its trailing newline.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.line_count() {
            return None;
        }
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Rune length of a line, newline excluded. Out of range reads as 0.
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(idx);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        len
    }

    /// Flat rune index of a position (newlines occupy one rune each).
    /// Addressing uses the raw rope lines so the empty slot after a
    /// trailing newline stays reachable (the cursor rests there while a
    /// freshly opened last line is being filled).
    pub fn rune_index(&self, pos: Position) -> usize {
        let line = pos.line.min(self.rope.len_lines().saturating_sub(1));
        let base = self.rope.line_to_char(line);
        base + pos.col.min(self.line_len(line))
    }

    /// Inverse of [`Buffer::rune_index`].
    pub fn position_of(&self, rune_idx: usize) -> Position {
        let idx = rune_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let col = idx - self.rope.line_to_char(line);
        Position::new(line, col)
    }

    pub fn rune_at(&self, rune_idx: usize) -> Option<char> {
        if rune_idx < self.rope.len_chars() {
            Some(self.rope.char(rune_idx))
        } else {
            None
        }
    }

    pub fn insert(&mut self, rune_idx: usize, text: &str) {
        self.rope.insert(rune_idx, text);
    }

    /// Remove `[start, end)` (flat rune indices) and return the removed text.
    pub fn remove(&mut self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        removed
    }

    /// First non-whitespace column of a line (0 for blank lines).
    pub fn first_non_ws(&self, line: usize) -> usize {
        self.line(line)
            .map(|l| {
                l.chars()
                    .position(|c| !c.is_whitespace())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_ignores_trailing_newline() {
        assert_eq!(Buffer::from_str("").line_count(), 1);
        assert_eq!(Buffer::from_str("a").line_count(), 1);
        assert_eq!(Buffer::from_str("a\n").line_count(), 1);
        assert_eq!(Buffer::from_str("a\nb").line_count(), 2);
    }

    #[test]
    fn line_access_strips_newline() {
        let buf = Buffer::from_str("alpha\nbeta");
        assert_eq!(buf.line(0).as_deref(), Some("alpha"));
        assert_eq!(buf.line(1).as_deref(), Some("beta"));
        assert_eq!(buf.line(2), None);
        assert_eq!(buf.line_len(0), 5);
    }

    #[test]
    fn rune_index_round_trip() {
        let buf = Buffer::from_str("ab\ncdé");
        let pos = Position::new(1, 2);
        let idx = buf.rune_index(pos);
        assert_eq!(idx, 5);
        assert_eq!(buf.position_of(idx), pos);
        assert_eq!(buf.rune_at(idx), Some('é'));
    }

    #[test]
    fn trailing_newline_slot_is_addressable() {
        let mut buf = Buffer::from_str("top\n");
        assert_eq!(buf.line_count(), 1);
        let idx = buf.rune_index(Position::new(1, 0));
        assert_eq!(idx, 4);
        buf.insert(idx, "mid");
        assert_eq!(buf.to_string(), "top\nmid");
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn remove_returns_removed_text() {
        let mut buf = Buffer::from_str("hello world");
        let removed = buf.remove(5, 11);
        assert_eq!(removed, " world");
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn first_non_ws_skips_indent() {
        let buf = Buffer::from_str("   indented\n\nplain");
        assert_eq!(buf.first_non_ws(0), 3);
        assert_eq!(buf.first_non_ws(1), 0);
        assert_eq!(buf.first_non_ws(2), 0);
    }

    #[test]
    fn rune_classes() {
        assert_eq!(rune_class('a'), RuneClass::Word);
        assert_eq!(rune_class('_'), RuneClass::Word);
        assert_eq!(rune_class('.'), RuneClass::Punctuation);
        assert_eq!(rune_class('\n'), RuneClass::Whitespace);
    }
}
