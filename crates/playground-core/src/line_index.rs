//! Rope-backed line index.
//!
//! Converts between `(line, column)` positions and character offsets and applies raw edits.
//! All inputs are clamped; nothing here panics on out-of-range coordinates.

use ropey::Rope;

/// Line-addressable text storage.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Index `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// `(line, column)` of a character offset, clamped to the end of the text.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Character offset of `(line, column)`.
    ///
    /// Lines past the end map to the end of the text; columns clamp to the line length.
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line) + column.min(self.line_len(line))
    }

    /// Length of `line` in characters, without its newline.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Number of lines. Empty text and text ending in a newline both count a final empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of characters.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Insert `text` at a character offset (clamped).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let at = char_offset.min(self.rope.len_chars());
        self.rope.insert(at, text);
    }

    /// Remove `len` characters starting at `start` (clamped).
    pub fn delete(&mut self, start: usize, len: usize) {
        let total = self.rope.len_chars();
        let start = start.min(total);
        let end = start.saturating_add(len).min(total);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Text in the half-open character range `start..end` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// The whole text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of `line` without its newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_one_line() {
        let index = LineIndex::default();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.line_text(0).as_deref(), Some(""));
    }

    #[test]
    fn test_offset_position_conversion() {
        let index = LineIndex::from_text("with Ada;\nbegin\nend;");

        assert_eq!(index.char_offset_to_position(0), (0, 0));
        assert_eq!(index.char_offset_to_position(9), (0, 9));
        assert_eq!(index.char_offset_to_position(10), (1, 0));
        assert_eq!(index.char_offset_to_position(500), (2, 4));

        assert_eq!(index.position_to_char_offset(1, 3), 13);
        assert_eq!(index.position_to_char_offset(1, 40), 15);
        assert_eq!(index.position_to_char_offset(7, 0), 20);
    }

    #[test]
    fn test_multibyte_lines() {
        let index = LineIndex::from_text("-- été\nnull;\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_len(0), 6);
        assert_eq!(index.line_len(2), 0);
        assert_eq!(index.line_text(1).as_deref(), Some("null;"));
        assert_eq!(index.line_text(3), None);
    }

    #[test]
    fn test_edits_clamp() {
        let mut index = LineIndex::from_text("null;");
        index.insert(99, "\n");
        index.insert(0, "   ");
        assert_eq!(index.text(), "   null;\n");
        assert_eq!(index.slice(3, 100), "null;\n");

        index.delete(7, 50);
        assert_eq!(index.text(), "   null");
    }
}
