//! Multi-resource workspace.
//!
//! A playground example is a set of named resources edited side by side. [`Workspace`] owns one
//! [`ResourceEditor`] per resource; each editor holds a [`GuardedBuffer`] built from the
//! resource's markers, a cursor, its fold regions and the diagnostics reported against it.
//!
//! Editors are addressed by basename, which is unique within a workspace. Markers are recognised
//! with the comment token of each resource's own language, picked from its extension; resources
//! of unknown type use the workspace's fallback syntax.

use crate::buffer::{Position, TextBuffer};
use crate::decorations::Decoration;
use crate::diagnostics::Diagnostic;
use crate::document::Document;
use crate::guard::GuardedBuffer;
use crate::regions::{FoldRegion, RegionExtractor};
use playground_lang::{CommentConfig, MarkerSyntax};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named text resource, the unit of transfer to and from the compile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// File name, unique within a submission.
    pub basename: String,
    /// Full text.
    pub contents: String,
}

impl Resource {
    /// Create a resource.
    pub fn new(basename: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            contents: contents.into(),
        }
    }
}

/// Workspace-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    /// Two resources share a basename.
    #[error("duplicate resource basename `{0}`")]
    DuplicateBasename(String),
    /// No editor is open for this basename.
    #[error("no resource named `{0}`")]
    UnknownResource(String),
}

/// One open resource.
#[derive(Debug)]
pub struct ResourceEditor {
    basename: String,
    initial_contents: String,
    extractor: RegionExtractor,
    buffer: GuardedBuffer<Document>,
    folds: Vec<FoldRegion>,
    cursor: Position,
    focused: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ResourceEditor {
    fn open(resource: Resource, fallback: &MarkerSyntax) -> Self {
        let syntax = CommentConfig::for_basename(&resource.basename)
            .map(MarkerSyntax::new)
            .unwrap_or_else(|| fallback.clone());
        let extractor = RegionExtractor::new(syntax);
        let (buffer, folds) =
            GuardedBuffer::from_markers(Document::new(&resource.contents), &extractor);
        Self {
            basename: resource.basename,
            initial_contents: resource.contents,
            extractor,
            buffer,
            folds,
            cursor: Position::default(),
            focused: false,
            diagnostics: Vec::new(),
        }
    }

    /// The resource basename.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// The extractor this resource's markers were read with.
    pub fn extractor(&self) -> &RegionExtractor {
        &self.extractor
    }

    /// Guarded buffer holding the cleaned text.
    pub fn buffer(&self) -> &GuardedBuffer<Document> {
        &self.buffer
    }

    /// Mutable access to the guarded buffer; every edit goes through the guard.
    pub fn buffer_mut(&mut self) -> &mut GuardedBuffer<Document> {
        &mut self.buffer
    }

    /// Foldable `#region` spans, in line order.
    pub fn folds(&self) -> &[FoldRegion] {
        &self.folds
    }

    /// Current cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor (clamped to the buffer).
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.buffer.clamp(pos);
    }

    /// Whether the host should give this editor keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Diagnostics reported against this resource by the latest job.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Read-only highlights followed by one marker per diagnostic.
    pub fn decorations(&self) -> Vec<Decoration> {
        let mut decorations = self.buffer.decorations();
        decorations.extend(self.diagnostics.iter().map(Decoration::diagnostic));
        decorations
    }

    /// Current contents as a [`Resource`], in the source's original line endings.
    pub fn resource(&self) -> Resource {
        Resource::new(self.basename.clone(), self.buffer.inner().export_text())
    }

    /// The resource as it was loaded, markers included.
    pub fn initial_resource(&self) -> Resource {
        Resource::new(self.basename.clone(), self.initial_contents.clone())
    }

    /// Returns `true` if the text differs from what was loaded (after marker removal).
    pub fn is_modified(&self) -> bool {
        let mut pristine = Document::new(&self.initial_contents);
        self.extractor.extract(&mut pristine);
        pristine.text() != self.buffer.text()
    }

    fn reset(&mut self) {
        let (buffer, folds) =
            GuardedBuffer::from_markers(Document::new(&self.initial_contents), &self.extractor);
        self.buffer = buffer;
        self.folds = folds;
        self.cursor = Position::default();
        self.diagnostics.clear();
    }
}

/// The set of resources of one loaded example.
#[derive(Debug, Default)]
pub struct Workspace {
    editors: Vec<ResourceEditor>,
    active: Option<usize>,
    fallback: MarkerSyntax,
}

impl Workspace {
    /// Create an empty workspace; `fallback` applies to resources whose language is unknown.
    pub fn new(fallback: MarkerSyntax) -> Self {
        Self {
            editors: Vec::new(),
            active: None,
            fallback,
        }
    }

    /// Replace the open resources with `resources`, extracting their markers.
    ///
    /// On error nothing is opened and the previous resources stay in place.
    pub fn open(&mut self, resources: Vec<Resource>) -> Result<(), WorkspaceError> {
        let mut seen = HashSet::new();
        for resource in &resources {
            if !seen.insert(resource.basename.as_str()) {
                return Err(WorkspaceError::DuplicateBasename(resource.basename.clone()));
            }
        }

        self.editors = resources
            .into_iter()
            .map(|resource| ResourceEditor::open(resource, &self.fallback))
            .collect();
        self.active = if self.editors.is_empty() { None } else { Some(0) };
        log::debug!("opened {} resources", self.editors.len());
        Ok(())
    }

    /// Marker syntax for resources of unknown language.
    pub fn fallback_syntax(&self) -> &MarkerSyntax {
        &self.fallback
    }

    /// Number of open resources.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Returns `true` if no resource is open.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Open editors, in load order.
    pub fn editors(&self) -> &[ResourceEditor] {
        &self.editors
    }

    /// Editor for `basename`.
    pub fn editor(&self, basename: &str) -> Option<&ResourceEditor> {
        self.editors.iter().find(|e| e.basename == basename)
    }

    /// Mutable editor for `basename`.
    pub fn editor_mut(&mut self, basename: &str) -> Option<&mut ResourceEditor> {
        self.editors.iter_mut().find(|e| e.basename == basename)
    }

    /// The active editor.
    pub fn active(&self) -> Option<&ResourceEditor> {
        self.active.and_then(|idx| self.editors.get(idx))
    }

    /// Make the editor for `basename` active.
    pub fn set_active(&mut self, basename: &str) -> Result<(), WorkspaceError> {
        let idx = self
            .index_of(basename)
            .ok_or_else(|| WorkspaceError::UnknownResource(basename.to_string()))?;
        self.activate(idx);
        Ok(())
    }

    /// Current contents of every resource, in load order.
    pub fn resources(&self) -> Vec<Resource> {
        self.editors.iter().map(ResourceEditor::resource).collect()
    }

    /// Every resource as it was loaded, markers included, in load order.
    pub fn initial_resources(&self) -> Vec<Resource> {
        self.editors.iter().map(ResourceEditor::initial_resource).collect()
    }

    /// Reopen the workspace with `replacements` substituted for the loaded resources of the same
    /// basename. Every other resource is reopened from its loaded contents, markers included.
    ///
    /// Fails without changing anything if a replacement names no open resource.
    pub fn override_resources(&mut self, replacements: Vec<Resource>) -> Result<(), WorkspaceError> {
        let mut resources = self.initial_resources();
        for replacement in replacements {
            let slot = resources
                .iter_mut()
                .find(|r| r.basename == replacement.basename)
                .ok_or_else(|| WorkspaceError::UnknownResource(replacement.basename.clone()))?;
            *slot = replacement;
        }
        self.open(resources)
    }

    /// Jump to the location named by `diagnostic`.
    ///
    /// Activates and focuses the matching editor and places its cursor at the reported line and
    /// column (clamped). Returns `false` if no resource has that basename.
    pub fn navigate(&mut self, diagnostic: &Diagnostic) -> bool {
        let Some(idx) = self.index_of(&diagnostic.basename) else {
            log::debug!("no editor for diagnostic in `{}`", diagnostic.basename);
            return false;
        };
        self.activate(idx);
        let editor = &mut self.editors[idx];
        editor.set_cursor(Position::new(
            diagnostic.line.saturating_sub(1),
            diagnostic.column,
        ));
        true
    }

    /// Attach diagnostics to the editors they name, replacing previous ones.
    ///
    /// Diagnostics for unknown basenames are ignored.
    pub fn apply_diagnostics<'a>(&mut self, diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
        for editor in &mut self.editors {
            editor.diagnostics.clear();
        }
        for diagnostic in diagnostics {
            if let Some(editor) = self.editor_mut(&diagnostic.basename) {
                editor.diagnostics.push(diagnostic.clone());
            }
        }
    }

    /// Restore every resource to the contents it was loaded with.
    pub fn reset(&mut self) {
        for editor in &mut self.editors {
            editor.reset();
        }
    }

    fn index_of(&self, basename: &str) -> Option<usize> {
        self.editors.iter().position(|e| e.basename == basename)
    }

    fn activate(&mut self, idx: usize) {
        for (i, editor) in self.editors.iter_mut().enumerate() {
            editor.focused = i == idx;
        }
        self.active = Some(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextRange;
    use crate::decorations::DecorationKind;

    fn workspace() -> Workspace {
        let mut ws = Workspace::new(MarkerSyntax::new(CommentConfig::ada()));
        ws.open(vec![
            Resource::new("main.adb", "with Foo;\nprocedure Main is\nbegin\n   Foo.Run;\nend Main;\n"),
            Resource::new("foo.ads", "package Foo is\n   procedure Run;\nend Foo;\n"),
        ])
        .unwrap();
        ws
    }

    #[test]
    fn test_duplicate_basenames_are_rejected() {
        let mut ws = workspace();
        let err = ws
            .open(vec![Resource::new("a.adb", ""), Resource::new("a.adb", "x")])
            .unwrap_err();
        assert_eq!(err, WorkspaceError::DuplicateBasename("a.adb".to_string()));
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn test_navigate_moves_cursor_and_focus() {
        let mut ws = workspace();
        let diagnostic = Diagnostic {
            basename: "foo.ads".to_string(),
            line: 2,
            column: 3,
            message: "error".to_string(),
        };
        assert!(ws.navigate(&diagnostic));
        let active = ws.active().unwrap();
        assert_eq!(active.basename(), "foo.ads");
        assert_eq!(active.cursor(), Position::new(1, 3));
        assert!(active.is_focused());
        assert!(!ws.editor("main.adb").unwrap().is_focused());
    }

    #[test]
    fn test_navigate_clamps_and_ignores_unknown() {
        let mut ws = workspace();
        let far = Diagnostic {
            basename: "foo.ads".to_string(),
            line: 3,
            column: 80,
            message: String::new(),
        };
        assert!(ws.navigate(&far));
        assert_eq!(ws.active().unwrap().cursor(), Position::new(2, 8));

        let unknown = Diagnostic {
            basename: "bar.adb".to_string(),
            ..far
        };
        assert!(!ws.navigate(&unknown));
        assert_eq!(ws.active().unwrap().basename(), "foo.ads");
    }

    #[test]
    fn test_apply_diagnostics_groups_by_basename() {
        let mut ws = workspace();
        let diagnostics = [
            Diagnostic {
                basename: "main.adb".to_string(),
                line: 1,
                column: 0,
                message: "a".to_string(),
            },
            Diagnostic {
                basename: "other.adb".to_string(),
                line: 1,
                column: 0,
                message: "b".to_string(),
            },
        ];
        ws.apply_diagnostics(&diagnostics);
        let main = ws.editor("main.adb").unwrap();
        assert_eq!(main.diagnostics().len(), 1);
        assert!(ws.editor("foo.ads").unwrap().diagnostics().is_empty());

        let decorations = main.decorations();
        assert_eq!(decorations.len(), 1);
        assert_eq!(decorations[0].kind, DecorationKind::Diagnostic);
        assert_eq!(decorations[0].range, TextRange::caret(Position::new(0, 0)));
        assert_eq!(decorations[0].tooltip.as_deref(), Some("a"));
    }
}
