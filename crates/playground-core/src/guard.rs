//! Read-only enforcement over any [`TextBuffer`].
//!
//! [`GuardedBuffer`] wraps a buffer together with its protected regions and intercepts every
//! mutation hook. Edits touching a protected region are dropped before they reach the inner
//! buffer, so a rejected operation leaves the text and the regions unchanged.

use crate::anchors::{AnchorId, Bias};
use crate::buffer::{Position, TextBuffer, TextRange};
use crate::decorations::Decoration;
use crate::regions::{FoldRegion, ProtectedRegion, RegionExtractor, normalize_ranges};

/// A keystroke as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Return / Enter.
    Enter,
    /// A printable character.
    Char(char),
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Tab.
    Tab,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
}

/// What the host should do with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key is consumed; the host must not process it.
    Swallowed,
    /// The host processes the key normally.
    PassThrough,
}

/// A buffer whose protected regions cannot be edited.
#[derive(Debug)]
pub struct GuardedBuffer<B: TextBuffer> {
    inner: B,
    regions: Vec<ProtectedRegion>,
}

impl<B: TextBuffer> GuardedBuffer<B> {
    /// Wrap `inner` with no protected regions.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            regions: Vec::new(),
        }
    }

    /// Wrap `inner` and protect the given ranges.
    pub fn with_regions(inner: B, ranges: Vec<TextRange>) -> Self {
        let mut guarded = Self::new(inner);
        for range in normalize_ranges(ranges) {
            guarded.protect(range);
        }
        guarded
    }

    /// Strip the markers from `inner` and guard the protected regions they delimited.
    pub fn from_markers(mut inner: B, extractor: &RegionExtractor) -> (Self, Vec<FoldRegion>) {
        let extraction = extractor.extract(&mut inner);
        (
            Self {
                inner,
                regions: extraction.regions,
            },
            extraction.folds,
        )
    }

    /// Protect `range`. Empty ranges are ignored; ranges overlapping existing regions are merged.
    pub fn protect(&mut self, range: TextRange) {
        if range.is_empty() {
            return;
        }
        if self.regions().iter().any(|r| r.touches(&range)) {
            let mut ranges = self.regions();
            ranges.push(range);
            self.clear_regions();
            for merged in normalize_ranges(ranges) {
                self.regions.push(ProtectedRegion::anchor(&mut self.inner, merged));
            }
            return;
        }

        let region = ProtectedRegion::anchor(&mut self.inner, range);
        let at = self
            .regions
            .iter()
            .position(|r| {
                r.resolve(&self.inner)
                    .is_some_and(|existing| existing.start > range.start)
            })
            .unwrap_or(self.regions.len());
        self.regions.insert(at, region);
    }

    /// Drop every protected region.
    pub fn clear_regions(&mut self) {
        for region in self.regions.drain(..) {
            region.release(&mut self.inner);
        }
    }

    /// Current protected ranges, in document order.
    pub fn regions(&self) -> Vec<TextRange> {
        self.regions
            .iter()
            .filter_map(|r| r.resolve(&self.inner))
            .collect()
    }

    /// Returns `true` if `pos` lies inside a protected region (end exclusive).
    pub fn is_protected(&self, pos: Position) -> bool {
        self.regions().iter().any(|r| r.contains(pos))
    }

    /// Returns `true` if `range` intersects a protected region.
    pub fn intersects_protected(&self, range: TextRange) -> bool {
        self.regions().iter().any(|r| range.intersects(r))
    }

    /// Returns `true` if `pos` is exactly the end of a protected region.
    pub fn is_region_end(&self, pos: Position) -> bool {
        self.regions().iter().any(|r| r.end == pos)
    }

    /// Read-only highlights for every protected region.
    pub fn decorations(&self) -> Vec<Decoration> {
        self.regions().into_iter().map(Decoration::read_only).collect()
    }

    /// Decide whether the host may process `key` with the caret at `cursor`.
    ///
    /// Enter at the very end of a protected region would split its last line into the region, so
    /// it is swallowed. Every other key passes through; its resulting edit is still guarded.
    pub fn handle_key(&self, key: &KeyInput, cursor: Position) -> KeyOutcome {
        match key {
            KeyInput::Enter if self.is_region_end(cursor) => {
                log::debug!("swallowed Enter at protected region end {cursor}");
                KeyOutcome::Swallowed
            }
            _ => KeyOutcome::PassThrough,
        }
    }

    /// The wrapped buffer.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwrap the guard, releasing its region anchors.
    pub fn into_inner(mut self) -> B {
        self.clear_regions();
        self.inner
    }

    fn clamp_range(&self, range: TextRange) -> TextRange {
        TextRange::new(self.inner.clamp(range.start), self.inner.clamp(range.end))
    }

    fn insertion_blocked(&self, at: Position) -> bool {
        self.regions().iter().any(|r| r.start <= at && at < r.end)
    }
}

impl<B: TextBuffer> TextBuffer for GuardedBuffer<B> {
    fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.inner.line_text(line)
    }

    fn text(&self) -> String {
        self.inner.text()
    }

    fn text_in(&self, range: TextRange) -> String {
        self.inner.text_in(range)
    }

    fn end_position(&self) -> Position {
        self.inner.end_position()
    }

    fn clamp(&self, pos: Position) -> Position {
        self.inner.clamp(pos)
    }

    fn find_all(&self, needle: &str) -> Vec<TextRange> {
        self.inner.find_all(needle)
    }

    fn insert(&mut self, at: Position, text: &str) -> Option<Position> {
        let at = self.inner.clamp(at);
        if self.insertion_blocked(at) {
            log::debug!("rejected insert at {at}: protected");
            return None;
        }
        self.inner.insert(at, text)
    }

    fn remove(&mut self, range: TextRange) -> Option<String> {
        let range = self.clamp_range(range);
        if self.intersects_protected(range) {
            log::debug!("rejected removal of {range}: protected");
            return None;
        }
        self.inner.remove(range)
    }

    fn move_text(&mut self, from: TextRange, to: Position) -> Option<TextRange> {
        let from = self.clamp_range(from);
        if self.intersects_protected(from) || self.insertion_blocked(self.inner.clamp(to)) {
            log::debug!("rejected move of {from} to {to}: protected");
            return None;
        }
        self.inner.move_text(from, to)
    }

    fn cut(&mut self, selection: TextRange) -> Option<String> {
        let selection = self.clamp_range(selection);
        if selection.is_empty() {
            return None;
        }
        if self.intersects_protected(selection) {
            log::debug!("rejected cut of {selection}: protected");
            return None;
        }
        self.inner.cut(selection)
    }

    fn paste(&mut self, selection: TextRange, text: &str) -> Option<Position> {
        let selection = self.clamp_range(selection);
        let blocked = if selection.is_empty() {
            self.insertion_blocked(selection.start)
        } else {
            self.intersects_protected(selection)
        };
        if blocked {
            log::debug!("rejected paste over {selection}: protected");
            return None;
        }
        self.inner.paste(selection, text)
    }

    fn create_anchor(&mut self, at: Position, bias: Bias) -> AnchorId {
        self.inner.create_anchor(at, bias)
    }

    fn anchor_position(&self, id: AnchorId) -> Option<Position> {
        self.inner.anchor_position(id)
    }

    fn release_anchor(&mut self, id: AnchorId) {
        self.inner.release_anchor(id)
    }
}
