//! First-class decorations data model.
//!
//! Decorations represent UI-facing annotations anchored to document ranges, without modifying
//! the document text. The playground produces two kinds:
//!
//! - read-only highlights for protected regions
//! - diagnostic markers for lines reported by the remote toolchain
//!
//! Decorations are derived state; they are recomputed on request and rendered by the host.

use crate::buffer::{Position, TextRange};
use crate::diagnostics::Diagnostic;

/// A source/layer identifier for decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationLayerId(pub u32);

impl DecorationLayerId {
    /// Decorations marking protected (read-only) regions.
    pub const READ_ONLY_REGIONS: Self = Self(1);
    /// Decorations produced from toolchain diagnostics.
    pub const DIAGNOSTICS: Self = Self(2);
}

/// A coarse decoration kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecorationKind {
    /// A protected range the user cannot edit.
    ReadOnly,
    /// A location reported by a diagnostic line.
    Diagnostic,
}

/// A single decoration item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Layer the decoration belongs to.
    pub layer: DecorationLayerId,
    /// Anchor range in buffer positions. Point decorations use an empty range.
    pub range: TextRange,
    /// A coarse decoration kind.
    pub kind: DecorationKind,
    /// Optional tooltip payload (plain text).
    pub tooltip: Option<String>,
}

impl Decoration {
    /// A read-only highlight covering `range`.
    pub fn read_only(range: TextRange) -> Self {
        Self {
            layer: DecorationLayerId::READ_ONLY_REGIONS,
            range,
            kind: DecorationKind::ReadOnly,
            tooltip: None,
        }
    }

    /// A point marker at a diagnostic's location, carrying its message.
    pub fn diagnostic(diagnostic: &Diagnostic) -> Self {
        let at = Position::new(diagnostic.line.saturating_sub(1), diagnostic.column);
        Self {
            layer: DecorationLayerId::DIAGNOSTICS,
            range: TextRange::caret(at),
            kind: DecorationKind::Diagnostic,
            tooltip: Some(diagnostic.message.clone()),
        }
    }
}
