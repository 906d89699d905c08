#![warn(missing_docs)]
//! Playground Core - headless protected-region engine for multi-resource code examples.
//!
//! # Overview
//!
//! `playground-core` models the editable side of a code playground. Example sources carry inline
//! markers (`begin readonly` / `end readonly`, `#region` / `#endregion`) inside line comments.
//! The core strips those markers, remembers which spans were delimited by them, and refuses any
//! edit that would touch a protected span while the text around it keeps changing.
//!
//! It does not render anything and does not talk to the network; the host provides key events
//! and edit requests, and reads back text, regions and cursor positions.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Workspace (resources, navigation, reset)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  GuardedBuffer (read-only enforcement)      │  ← Edit policy
//! ├─────────────────────────────────────────────┤
//! │  RegionExtractor (markers → regions/folds)  │  ← Marker parsing
//! ├─────────────────────────────────────────────┤
//! │  Document + AnchorArena                     │  ← Text + live offsets
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use playground_core::{Document, GuardedBuffer, Position, RegionExtractor, TextBuffer};
//! use playground_lang::{CommentConfig, MarkerSyntax};
//!
//! let source = "procedure Main is\n-- begin readonly\nbegin\n-- end readonly\n   null;\nend Main;\n";
//! let extractor = RegionExtractor::new(MarkerSyntax::new(CommentConfig::ada()));
//! let (mut buffer, _folds) = GuardedBuffer::from_markers(Document::new(source), &extractor);
//!
//! assert_eq!(buffer.text(), "procedure Main is\nbegin\n   null;\nend Main;\n");
//!
//! // "begin" is protected
//! assert!(buffer.insert(Position::new(1, 2), "x").is_none());
//! assert!(buffer.insert(Position::new(2, 0), "   Put_Line (\"hi\");\n").is_some());
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - positions, ranges and the [`TextBuffer`] capability
//! - [`document`] - rope-backed buffer with anchors
//! - [`regions`] - marker scanning and region extraction
//! - [`guard`] - read-only enforcement and key filtering
//! - [`diagnostics`] - toolchain output classification
//! - [`workspace`] - multi-resource model and diagnostic navigation

pub mod anchors;
pub mod buffer;
pub mod decorations;
pub mod delta;
pub mod diagnostics;
pub mod document;
pub mod guard;
pub mod line_ending;
pub mod line_index;
pub mod regions;
pub mod search;
pub mod workspace;

pub use anchors::{AnchorArena, AnchorId, Bias};
pub use buffer::{Position, TextBuffer, TextRange};
pub use decorations::{Decoration, DecorationKind, DecorationLayerId};
pub use delta::TextDeltaEdit;
pub use diagnostics::{Diagnostic, DiagnosticParser, OutputLine, RunSummary};
pub use document::Document;
pub use guard::{GuardedBuffer, KeyInput, KeyOutcome};
pub use line_ending::LineEnding;
pub use line_index::LineIndex;
pub use regions::{
    Extraction, FoldPair, FoldRegion, MarkerLine, MarkerScan, ProtectedRegion, RegionExtractor,
    normalize_ranges,
};
pub use search::{SearchError, SearchMatch, find_all};
pub use workspace::{Resource, ResourceEditor, Workspace, WorkspaceError};
