//! Buffer-owned anchors.
//!
//! An anchor is a character offset that moves with the text around it. Anchors live in an
//! arena owned by the buffer; callers hold [`AnchorId`] handles (slot + generation) and resolve
//! them on demand. Every edit applied to the buffer is replayed on the arena so each live anchor
//! keeps denoting the same logical place in the document.

use crate::delta::TextDeltaEdit;

/// Which side of an insertion made exactly at an anchor the anchor sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Stay before text inserted at the anchor offset.
    Left,
    /// Move after text inserted at the anchor offset.
    Right,
}

/// Stable handle to an anchor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    offset: usize,
    bias: Bias,
    generation: u32,
    live: bool,
}

/// Arena of anchors, addressed by [`AnchorId`].
#[derive(Debug, Clone, Default)]
pub struct AnchorArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl AnchorArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live anchors.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no anchor is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate an anchor at `offset`.
    pub fn create(&mut self, offset: usize, bias: Bias) -> AnchorId {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.offset = offset;
            entry.bias = bias;
            entry.live = true;
            return AnchorId {
                slot,
                generation: entry.generation,
            };
        }

        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            offset,
            bias,
            generation: 0,
            live: true,
        });
        AnchorId {
            slot,
            generation: 0,
        }
    }

    /// Current offset of `id`, or `None` if it was released.
    pub fn get(&self, id: AnchorId) -> Option<usize> {
        self.slot(id).map(|s| s.offset)
    }

    /// Release `id`. Stale or unknown handles are ignored.
    pub fn release(&mut self, id: AnchorId) {
        let Some(entry) = self.slots.get_mut(id.slot as usize) else {
            return;
        };
        if !entry.live || entry.generation != id.generation {
            return;
        }
        entry.live = false;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
    }

    fn slot(&self, id: AnchorId) -> Option<&Slot> {
        self.slots
            .get(id.slot as usize)
            .filter(|s| s.live && s.generation == id.generation)
    }

    /// Update every live anchor for an edit applied at `edit.start`.
    pub fn apply_edit(&mut self, edit: &TextDeltaEdit) {
        let start = edit.start;
        let deleted = edit.deleted_len();
        let inserted = edit.inserted_len();
        let end = edit.end();

        for entry in self.slots.iter_mut().filter(|s| s.live) {
            let mut offset = entry.offset;

            // Deletion collapses anything inside `[start, end]` onto `start`.
            if deleted > 0 && offset > start {
                offset = if offset >= end {
                    offset - deleted
                } else {
                    start
                };
            }

            if inserted > 0 {
                let pushed = offset > start || (offset == start && entry.bias == Bias::Right);
                if pushed {
                    offset += inserted;
                }
            }

            entry.offset = offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(start: usize, text: &str) -> TextDeltaEdit {
        TextDeltaEdit {
            start,
            deleted_text: String::new(),
            inserted_text: text.to_string(),
        }
    }

    fn delete(start: usize, text: &str) -> TextDeltaEdit {
        TextDeltaEdit {
            start,
            deleted_text: text.to_string(),
            inserted_text: String::new(),
        }
    }

    #[test]
    fn test_insert_respects_bias() {
        let mut arena = AnchorArena::new();
        let left = arena.create(5, Bias::Left);
        let right = arena.create(5, Bias::Right);
        let before = arena.create(2, Bias::Right);

        arena.apply_edit(&insert(5, "abc"));

        assert_eq!(arena.get(left), Some(5));
        assert_eq!(arena.get(right), Some(8));
        assert_eq!(arena.get(before), Some(2));
    }

    #[test]
    fn test_delete_collapses_and_shifts() {
        let mut arena = AnchorArena::new();
        let inside = arena.create(12, Bias::Left);
        let at_end = arena.create(15, Bias::Left);
        let after = arena.create(20, Bias::Right);
        let at_start = arena.create(10, Bias::Right);

        arena.apply_edit(&delete(10, "hello"));

        assert_eq!(arena.get(inside), Some(10));
        assert_eq!(arena.get(at_end), Some(10));
        assert_eq!(arena.get(after), Some(15));
        assert_eq!(arena.get(at_start), Some(10));
    }

    #[test]
    fn test_replace_moves_collapsed_anchor_by_bias() {
        let mut arena = AnchorArena::new();
        let left = arena.create(3, Bias::Left);
        let right = arena.create(3, Bias::Right);

        arena.apply_edit(&TextDeltaEdit {
            start: 1,
            deleted_text: "xy".to_string(),
            inserted_text: "long".to_string(),
        });

        assert_eq!(arena.get(left), Some(1));
        assert_eq!(arena.get(right), Some(5));
    }

    #[test]
    fn test_release_invalidates_handle_and_reuses_slot() {
        let mut arena = AnchorArena::new();
        let first = arena.create(1, Bias::Left);
        arena.release(first);
        assert_eq!(arena.get(first), None);
        assert!(arena.is_empty());

        let second = arena.create(7, Bias::Left);
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.get(second), Some(7));
        assert_eq!(arena.len(), 1);

        // Releasing a stale handle must not free the reused slot.
        arena.release(first);
        assert_eq!(arena.get(second), Some(7));
    }
}
