//! Rope-backed [`TextBuffer`] implementation.

use crate::anchors::{AnchorArena, AnchorId, Bias};
use crate::buffer::{Position, TextBuffer, TextRange};
use crate::delta::TextDeltaEdit;
use crate::line_ending::LineEnding;
use crate::line_index::LineIndex;
use crate::search::find_all;

/// A plain, unguarded text document.
///
/// Text is stored with LF newlines; CRLF input is normalized on load and its [`LineEnding`] is
/// kept so the original form can be restored on export. Every edit is applied to the line index
/// and replayed on the anchor arena.
#[derive(Debug, Clone, Default)]
pub struct Document {
    index: LineIndex,
    anchors: AnchorArena,
    line_ending: LineEnding,
}

impl Document {
    /// Create a document holding `text`.
    pub fn new(text: &str) -> Self {
        let line_ending = LineEnding::detect_in_text(text);
        Self {
            index: LineIndex::from_text(&LineEnding::normalize(text)),
            anchors: AnchorArena::default(),
            line_ending,
        }
    }

    /// Newline sequence the source text used.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Document text with the source's newline sequence restored.
    pub fn export_text(&self) -> String {
        self.line_ending.apply_to_text(&self.index.text())
    }

    /// Live anchors owned by this document.
    pub fn anchors(&self) -> &AnchorArena {
        &self.anchors
    }

    /// Convert a position to a character offset (clamped).
    pub fn offset_of(&self, pos: Position) -> usize {
        self.index.position_to_char_offset(pos.line, pos.column)
    }

    /// Convert a character offset to a position (clamped).
    pub fn position_of(&self, offset: usize) -> Position {
        let (line, column) = self.index.char_offset_to_position(offset);
        Position::new(line, column)
    }

    fn apply(&mut self, edits: Vec<TextDeltaEdit>) {
        for edit in &edits {
            self.index.delete(edit.start, edit.deleted_len());
            self.index.insert(edit.start, &edit.inserted_text);
            self.anchors.apply_edit(edit);
        }
    }
}

impl TextBuffer for Document {
    fn line_count(&self) -> usize {
        self.index.line_count()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.index.line_text(line)
    }

    fn text(&self) -> String {
        self.index.text()
    }

    fn text_in(&self, range: TextRange) -> String {
        self.index
            .slice(self.offset_of(range.start), self.offset_of(range.end))
    }

    fn end_position(&self) -> Position {
        self.position_of(self.index.char_count())
    }

    fn clamp(&self, pos: Position) -> Position {
        self.position_of(self.offset_of(pos))
    }

    fn find_all(&self, needle: &str) -> Vec<TextRange> {
        // Escaped queries only fail past the regex size limit.
        let matches = match find_all(&self.text(), needle) {
            Ok(matches) => matches,
            Err(err) => {
                log::warn!("search for {needle:?} failed: {err}");
                return Vec::new();
            }
        };

        matches
            .into_iter()
            .map(|m| TextRange::new(self.position_of(m.start), self.position_of(m.end)))
            .collect()
    }

    fn insert(&mut self, at: Position, text: &str) -> Option<Position> {
        let start = self.offset_of(at);
        let text = LineEnding::normalize(text);
        let len = text.chars().count();
        if len > 0 {
            self.apply(vec![TextDeltaEdit {
                start,
                deleted_text: String::new(),
                inserted_text: text,
            }]);
        }
        Some(self.position_of(start + len))
    }

    fn remove(&mut self, range: TextRange) -> Option<String> {
        let start = self.offset_of(range.start);
        let end = self.offset_of(range.end);
        let removed = self.index.slice(start, end);
        if !removed.is_empty() {
            self.apply(vec![TextDeltaEdit {
                start,
                deleted_text: removed.clone(),
                inserted_text: String::new(),
            }]);
        }
        Some(removed)
    }

    fn move_text(&mut self, from: TextRange, to: Position) -> Option<TextRange> {
        let start = self.offset_of(from.start);
        let end = self.offset_of(from.end);
        let target = self.offset_of(to);
        if start == end || (start..=end).contains(&target) {
            return Some(TextRange::new(self.position_of(start), self.position_of(end)));
        }

        let moved = self.index.slice(start, end);
        let len = end - start;
        let insert_at = if target > end { target - len } else { target };
        self.apply(vec![
            TextDeltaEdit {
                start,
                deleted_text: moved.clone(),
                inserted_text: String::new(),
            },
            TextDeltaEdit {
                start: insert_at,
                deleted_text: String::new(),
                inserted_text: moved,
            },
        ]);

        Some(TextRange::new(
            self.position_of(insert_at),
            self.position_of(insert_at + len),
        ))
    }

    fn create_anchor(&mut self, at: Position, bias: Bias) -> AnchorId {
        let offset = self.offset_of(at);
        self.anchors.create(offset, bias)
    }

    fn anchor_position(&self, id: AnchorId) -> Option<Position> {
        self.anchors.get(id).map(|offset| self.position_of(offset))
    }

    fn release_anchor(&mut self, id: AnchorId) {
        self.anchors.release(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut doc = Document::new("hello\nworld");
        let end = doc.insert(Position::new(1, 0), "big ");
        assert_eq!(end, Some(Position::new(1, 4)));
        assert_eq!(doc.text(), "hello\nbig world");

        let removed = doc.remove(TextRange::new(Position::new(0, 3), Position::new(1, 1)));
        assert_eq!(removed.as_deref(), Some("lo\nb"));
        assert_eq!(doc.text(), "helig world");
    }

    #[test]
    fn test_anchor_tracks_edits() {
        let mut doc = Document::new("abc\ndef");
        let anchor = doc.create_anchor(Position::new(1, 1), Bias::Left);

        doc.insert(Position::new(0, 0), "xx\n");
        assert_eq!(doc.anchor_position(anchor), Some(Position::new(2, 1)));

        doc.remove(TextRange::new(Position::new(0, 0), Position::new(1, 0)));
        assert_eq!(doc.anchor_position(anchor), Some(Position::new(1, 1)));

        doc.release_anchor(anchor);
        assert_eq!(doc.anchor_position(anchor), None);
    }

    #[test]
    fn test_move_text_forward_and_backward() {
        let mut doc = Document::new("one two three");
        let moved = doc.move_text(
            TextRange::new(Position::new(0, 0), Position::new(0, 4)),
            Position::new(0, 13),
        );
        assert_eq!(doc.text(), "two threeone ");
        assert_eq!(
            moved,
            Some(TextRange::new(Position::new(0, 9), Position::new(0, 13)))
        );

        doc.move_text(
            TextRange::new(Position::new(0, 9), Position::new(0, 13)),
            Position::new(0, 0),
        );
        assert_eq!(doc.text(), "one two three");
    }

    #[test]
    fn test_move_into_itself_is_noop() {
        let mut doc = Document::new("abcdef");
        let range = TextRange::new(Position::new(0, 1), Position::new(0, 4));
        assert_eq!(doc.move_text(range, Position::new(0, 2)), Some(range));
        assert_eq!(doc.text(), "abcdef");
    }

    #[test]
    fn test_find_all_returns_positions() {
        let doc = Document::new("x := 1;\n-- end readonly\n");
        let found = doc.find_all("end readonly");
        assert_eq!(
            found,
            vec![TextRange::new(Position::new(1, 3), Position::new(1, 15))]
        );
    }

    #[test]
    fn test_crlf_is_normalized_and_restored() {
        let mut doc = Document::new("A\r\nB\r\n");
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
        assert_eq!(doc.text(), "A\nB\n");
        assert_eq!(doc.line_text(0).as_deref(), Some("A"));
        assert_eq!(doc.end_position(), Position::new(2, 0));

        doc.insert(Position::new(0, 1), "x\ny");
        assert_eq!(doc.export_text(), "Ax\r\ny\r\nB\r\n");
        assert_eq!(Document::new("A\nB").export_text(), "A\nB");
    }
}
