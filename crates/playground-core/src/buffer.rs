//! Buffer coordinates and the [`TextBuffer`] capability.
//!
//! The protected-region engine never talks to a concrete editor widget. It works against
//! [`TextBuffer`], a line/column-addressed document that exposes substring search, the mutation
//! hooks the guard intercepts, and buffer-owned anchors.

use crate::anchors::{AnchorId, Bias};
use std::cmp::Ordering;
use std::fmt;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of positions (`start..end`), with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl TextRange {
    /// Create a range; the endpoints are swapped if given out of order.
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// An empty range at `at` (a caret).
    pub fn caret(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Returns `true` if the range covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `pos` lies in `[start, end)`.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Returns `true` if the two ranges share text, or if an empty `self` lies strictly inside
    /// `other`.
    pub fn intersects(&self, other: &TextRange) -> bool {
        if self.is_empty() {
            return other.start < self.start && self.start < other.end;
        }
        if other.is_empty() {
            return self.start < other.start && other.start < self.end;
        }
        self.start < other.end && other.start < self.end
    }

    /// Returns `true` if the ranges overlap or share an endpoint.
    pub fn touches(&self, other: &TextRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// An editable, line/column-addressed text document.
///
/// Mutation hooks return `None` when the operation was dropped (e.g. by a guard); callers that
/// need to know whether an edit took effect inspect the returned value or the buffer state.
pub trait TextBuffer {
    /// Number of logical lines (an empty document has one line).
    fn line_count(&self) -> usize;

    /// Text of `line` without its terminator.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Full document text.
    fn text(&self) -> String;

    /// Text covered by `range` (clamped to the document).
    fn text_in(&self, range: TextRange) -> String;

    /// Position just past the last character.
    fn end_position(&self) -> Position;

    /// Clamp `pos` to an existing line and column.
    fn clamp(&self, pos: Position) -> Position;

    /// All occurrences of `needle`, in document order.
    fn find_all(&self, needle: &str) -> Vec<TextRange>;

    /// Insert `text` at `at`; returns the position just past the inserted text.
    fn insert(&mut self, at: Position, text: &str) -> Option<Position>;

    /// Remove `range`; returns the removed text.
    fn remove(&mut self, range: TextRange) -> Option<String>;

    /// Move the text of `from` so it starts at `to` (expressed before the move); returns the
    /// range the text occupies afterwards.
    fn move_text(&mut self, from: TextRange, to: Position) -> Option<TextRange>;

    /// Cut the selection; returns the removed text for the clipboard.
    fn cut(&mut self, selection: TextRange) -> Option<String> {
        if selection.is_empty() {
            return None;
        }
        self.remove(selection)
    }

    /// Replace the selection (possibly empty) with `text`.
    fn paste(&mut self, selection: TextRange, text: &str) -> Option<Position> {
        if !selection.is_empty() {
            self.remove(selection)?;
        }
        self.insert(selection.start, text)
    }

    /// Allocate a buffer-owned anchor at `at`.
    fn create_anchor(&mut self, at: Position, bias: Bias) -> AnchorId;

    /// Resolve an anchor, or `None` once released.
    fn anchor_position(&self, id: AnchorId) -> Option<Position>;

    /// Release an anchor handle.
    fn release_anchor(&mut self, id: AnchorId);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(a: (usize, usize), b: (usize, usize)) -> TextRange {
        TextRange::new(Position::new(a.0, a.1), Position::new(b.0, b.1))
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_range_normalizes_endpoints() {
        let r = range((3, 0), (1, 2));
        assert_eq!(r.start, Position::new(1, 2));
        assert_eq!(r.end, Position::new(3, 0));
    }

    #[test]
    fn test_intersects_is_half_open() {
        let region = range((1, 0), (2, 0));
        assert!(range((0, 0), (1, 1)).intersects(&region));
        assert!(!range((0, 0), (1, 0)).intersects(&region));
        assert!(!range((2, 0), (3, 0)).intersects(&region));
        assert!(range((1, 5), (1, 6)).intersects(&region));
    }

    #[test]
    fn test_empty_range_intersects_only_strictly_inside() {
        let region = range((1, 0), (2, 0));
        assert!(TextRange::caret(Position::new(1, 3)).intersects(&region));
        assert!(!TextRange::caret(Position::new(1, 0)).intersects(&region));
        assert!(!TextRange::caret(Position::new(2, 0)).intersects(&region));
    }

    #[test]
    fn test_touches() {
        let a = range((0, 0), (1, 0));
        assert!(a.touches(&range((1, 0), (2, 0))));
        assert!(!a.touches(&range((1, 1), (2, 0))));
    }
}
