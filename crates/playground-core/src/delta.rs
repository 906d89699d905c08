//! Edit records.
//!
//! A [`Document`](crate::Document) performs each mutation as a list of [`TextDeltaEdit`]s in
//! character offsets. The same edits move the document's anchors, which is how protected
//! regions stay attached to their text.

/// One replacement: `deleted_text` at `start` becomes `inserted_text`.
///
/// `start` is a character offset in the text as it is when this edit applies, so edits of one
/// mutation must be replayed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Character offset of the replacement.
    pub start: usize,
    /// Removed text (may be empty).
    pub deleted_text: String,
    /// Inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Removed length in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Inserted length in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end of the removed span, before the edit.
    pub fn end(&self) -> usize {
        self.start + self.deleted_len()
    }
}
