//! Marker-driven region extraction.
//!
//! Example sources carry two families of inline markers, written inside line comments:
//!
//! - protection markers (`begin readonly` / `end readonly`) delimiting text the user may not
//!   edit;
//! - fold markers (`#region NAME` / `#endregion NAME`) delimiting named, foldable spans.
//!
//! [`RegionExtractor::scan`] locates the markers and computes protected ranges in the
//! coordinates of the unmodified buffer. [`MarkerScan::apply`] then removes every marker line
//! and returns anchored [`ProtectedRegion`]s and [`FoldRegion`]s describing the cleaned text.
//!
//! Matching is purely lexical: begin/end markers pair through a stack, orphans are resolved
//! against the document boundaries, and nothing here ever fails.

use crate::anchors::{AnchorId, Bias};
use crate::buffer::{Position, TextBuffer, TextRange};
use playground_lang::{MarkerKind, MarkerSyntax};
use std::collections::BTreeSet;

/// A marker line found by [`RegionExtractor::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerLine {
    /// What the line declares.
    pub kind: MarkerKind,
    /// The full text of the line (without terminator).
    pub range: TextRange,
}

impl MarkerLine {
    /// Zero-based line index of the marker.
    pub fn line(&self) -> usize {
        self.range.start.line
    }
}

/// A matched `#region` / `#endregion` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPair {
    /// Region name (may be empty).
    pub name: String,
    /// The opening marker line.
    pub open: TextRange,
    /// The closing marker line.
    pub close: TextRange,
}

/// Result of scanning a buffer, in pre-removal coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerScan {
    /// Every marker line, in document order.
    pub markers: Vec<MarkerLine>,
    /// Normalized protected ranges (sorted, non-overlapping, non-touching).
    pub protected: Vec<TextRange>,
    /// Matched fold marker pairs, ordered by their closing marker.
    pub folds: Vec<FoldPair>,
}

/// A named foldable span of lines in the cleaned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    /// Region name taken from the marker (may be empty).
    pub name: String,
    /// First line of the region.
    pub start_line: usize,
    /// Last line of the region (inclusive).
    pub end_line: usize,
}

impl FoldRegion {
    /// Check if line number is within fold region
    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// A read-only range whose boundaries are anchors owned by the buffer.
///
/// The start anchor moves after text inserted exactly at it and the end anchor stays before, so
/// text added at either boundary never becomes part of the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedRegion {
    start: AnchorId,
    end: AnchorId,
}

impl ProtectedRegion {
    /// Anchor `range` in `buffer`.
    pub fn anchor<B: TextBuffer + ?Sized>(buffer: &mut B, range: TextRange) -> Self {
        Self {
            start: buffer.create_anchor(range.start, Bias::Right),
            end: buffer.create_anchor(range.end, Bias::Left),
        }
    }

    /// Current range of the region, or `None` if its anchors were released.
    pub fn resolve<B: TextBuffer + ?Sized>(&self, buffer: &B) -> Option<TextRange> {
        let start = buffer.anchor_position(self.start)?;
        let end = buffer.anchor_position(self.end)?;
        Some(TextRange::new(start, end))
    }

    /// Release the region's anchors.
    pub fn release<B: TextBuffer + ?Sized>(self, buffer: &mut B) {
        buffer.release_anchor(self.start);
        buffer.release_anchor(self.end);
    }
}

/// Everything [`MarkerScan::apply`] derives from a buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Protected regions in the cleaned buffer, sorted by start.
    pub regions: Vec<ProtectedRegion>,
    /// Fold regions in the cleaned buffer, sorted by start line.
    pub folds: Vec<FoldRegion>,
}

/// Sort ranges and merge the ones that overlap or touch.
pub fn normalize_ranges(mut ranges: Vec<TextRange>) -> Vec<TextRange> {
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.touches(&range) => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Finds protection and fold markers in a buffer.
#[derive(Debug, Clone, Default)]
pub struct RegionExtractor {
    syntax: MarkerSyntax,
}

impl RegionExtractor {
    /// Create an extractor for the given marker syntax.
    pub fn new(syntax: MarkerSyntax) -> Self {
        Self { syntax }
    }

    /// The marker syntax in use.
    pub fn syntax(&self) -> &MarkerSyntax {
        &self.syntax
    }

    /// Locate markers and compute protected ranges without modifying the buffer.
    pub fn scan<B: TextBuffer + ?Sized>(&self, buffer: &B) -> MarkerScan {
        let mut candidate_lines = BTreeSet::new();
        for phrase in self.syntax.phrases() {
            for found in buffer.find_all(phrase) {
                candidate_lines.insert(found.start.line);
            }
        }

        let markers: Vec<MarkerLine> = candidate_lines
            .into_iter()
            .filter_map(|line| {
                let text = buffer.line_text(line)?;
                let kind = self.syntax.classify(&text)?;
                let range = TextRange::new(
                    Position::new(line, 0),
                    Position::new(line, text.chars().count()),
                );
                Some(MarkerLine { kind, range })
            })
            .collect();

        let protected = normalize_ranges(protected_ranges(&markers, buffer.end_position()));
        let folds = fold_pairs(&markers);

        MarkerScan {
            markers,
            protected,
            folds,
        }
    }

    /// Scan `buffer`, strip its marker lines and return the anchored result.
    pub fn extract<B: TextBuffer + ?Sized>(&self, buffer: &mut B) -> Extraction {
        self.scan(&*buffer).apply(buffer)
    }
}

fn protected_ranges(markers: &[MarkerLine], document_end: Position) -> Vec<TextRange> {
    let mut stack: Vec<TextRange> = Vec::new();
    let mut ranges = Vec::new();

    for marker in markers {
        match marker.kind {
            MarkerKind::BeginReadOnly => stack.push(marker.range),
            MarkerKind::EndReadOnly => match stack.pop() {
                Some(begin) => ranges.push(TextRange::new(begin.start, marker.range.end)),
                None => {
                    log::warn!(
                        "orphan `end readonly` at line {}; protecting from document start",
                        marker.line()
                    );
                    ranges.push(TextRange::new(Position::default(), marker.range.end));
                }
            },
            MarkerKind::RegionStart(_) | MarkerKind::RegionEnd(_) => {}
        }
    }

    for begin in stack {
        log::warn!(
            "orphan `begin readonly` at line {}; protecting to document end",
            begin.start.line
        );
        ranges.push(TextRange::new(begin.start, document_end));
    }

    ranges
}

fn fold_pairs(markers: &[MarkerLine]) -> Vec<FoldPair> {
    let mut open: Vec<(&str, TextRange)> = Vec::new();
    let mut pairs = Vec::new();

    for marker in markers {
        match &marker.kind {
            MarkerKind::RegionStart(name) => open.push((name.as_str(), marker.range)),
            MarkerKind::RegionEnd(name) => {
                match open.iter().rposition(|(open_name, _)| *open_name == name.as_str()) {
                    Some(idx) => {
                        let (_, start) = open.remove(idx);
                        pairs.push(FoldPair {
                            name: name.clone(),
                            open: start,
                            close: marker.range,
                        });
                    }
                    None => log::debug!("unmatched `#endregion {name}` at line {}", marker.line()),
                }
            }
            MarkerKind::BeginReadOnly | MarkerKind::EndReadOnly => {}
        }
    }

    for (name, range) in open {
        log::debug!("unmatched `#region {name}` at line {}", range.start.line);
    }

    pairs
}

/// The text to delete for a marker line at `line`: the line plus one terminator.
///
/// Opening markers take the terminator that follows them, closing markers the one that precedes
/// them, so spans end on the last line of their content.
fn marker_removal_range<B: TextBuffer + ?Sized>(
    buffer: &B,
    line: usize,
    opening: bool,
) -> TextRange {
    let last_line = buffer.line_count().saturating_sub(1);
    let line_end = |l: usize| {
        let len = buffer.line_text(l).map_or(0, |t| t.chars().count());
        Position::new(l, len)
    };

    let take_following = if opening {
        line < last_line || line == 0
    } else {
        line == 0
    };

    if take_following {
        let end = if line < last_line {
            Position::new(line + 1, 0)
        } else {
            line_end(line)
        };
        TextRange::new(Position::new(line, 0), end)
    } else {
        TextRange::new(line_end(line - 1), line_end(line))
    }
}

impl MarkerScan {
    /// Returns `true` if the scan found no marker at all.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Remove every marker line from `buffer` and anchor the surviving regions.
    ///
    /// Regions that end up empty once their marker lines are gone are dropped. `buffer` must be
    /// the one that was scanned, unmodified since.
    pub fn apply<B: TextBuffer + ?Sized>(self, buffer: &mut B) -> Extraction {
        if self.markers.is_empty() {
            return Extraction::default();
        }

        let tracked: Vec<ProtectedRegion> = self
            .protected
            .iter()
            .map(|range| ProtectedRegion::anchor(buffer, *range))
            .collect();
        let tracked_folds: Vec<(String, ProtectedRegion)> = self
            .folds
            .iter()
            .map(|pair| {
                let span = TextRange::new(pair.open.start, pair.close.end);
                (pair.name.clone(), ProtectedRegion::anchor(buffer, span))
            })
            .collect();

        for marker in self.markers.iter().rev() {
            let removal = marker_removal_range(&*buffer, marker.line(), marker.kind.is_opening());
            buffer.remove(removal);
        }

        let resolved: Vec<TextRange> = tracked
            .into_iter()
            .filter_map(|region| {
                let range = region.resolve(&*buffer);
                region.release(buffer);
                range
            })
            .filter(|range| !range.is_empty())
            .collect();

        let regions = normalize_ranges(resolved)
            .into_iter()
            .map(|range| ProtectedRegion::anchor(buffer, range))
            .collect();

        let mut folds: Vec<FoldRegion> = tracked_folds
            .into_iter()
            .filter_map(|(name, span)| {
                let range = span.resolve(&*buffer);
                span.release(buffer);
                let range = range.filter(|r| !r.is_empty())?;
                Some(FoldRegion {
                    name,
                    start_line: range.start.line,
                    end_line: range.end.line,
                })
            })
            .collect();
        folds.sort_by_key(|f| (f.start_line, f.end_line));

        Extraction { regions, folds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use playground_lang::CommentConfig;

    fn extractor() -> RegionExtractor {
        RegionExtractor::new(MarkerSyntax::new(CommentConfig::ada()))
    }

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_normalize_merges_overlapping_and_touching() {
        let ranges = vec![
            TextRange::new(pos(5, 0), pos(6, 0)),
            TextRange::new(pos(0, 0), pos(1, 0)),
            TextRange::new(pos(1, 0), pos(2, 3)),
            TextRange::new(pos(2, 0), pos(2, 1)),
        ];
        assert_eq!(
            normalize_ranges(ranges),
            vec![
                TextRange::new(pos(0, 0), pos(2, 3)),
                TextRange::new(pos(5, 0), pos(6, 0)),
            ]
        );
    }

    #[test]
    fn test_scan_without_markers() {
        let doc = Document::new("procedure Main is\nbegin\n   null;\nend Main;\n");
        let scan = extractor().scan(&doc);
        assert!(scan.is_empty());
        assert!(scan.protected.is_empty());
    }

    #[test]
    fn test_marker_in_code_line_is_ignored() {
        let doc = Document::new("X := 1; -- begin readonly\nY := 2;");
        assert!(extractor().scan(&doc).is_empty());
    }

    #[test]
    fn test_nested_fold_pairs_match_by_name() {
        let doc = Document::new(
            "-- #region outer\n-- #region inner\na\n-- #endregion inner\nb\n-- #endregion outer\n",
        );
        let scan = extractor().scan(&doc);
        let names: Vec<&str> = scan.folds.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["inner", "outer"]);
        assert!(scan.protected.is_empty());
    }

    #[test]
    fn test_removal_range_for_last_line_closing_marker() {
        let doc = Document::new("a\n-- end readonly");
        assert_eq!(
            marker_removal_range(&doc, 1, false),
            TextRange::new(pos(0, 1), pos(1, 15))
        );
        assert_eq!(
            marker_removal_range(&doc, 1, true),
            TextRange::new(pos(0, 1), pos(1, 15))
        );
        assert_eq!(
            marker_removal_range(&doc, 0, true),
            TextRange::new(pos(0, 0), pos(1, 0))
        );
    }
}
