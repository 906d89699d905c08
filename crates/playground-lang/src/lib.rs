#![warn(missing_docs)]
//! `playground-lang` - data-driven language configuration helpers for `playground-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing or
//! highlighting system. It describes the inline markers the playground understands and how they
//! are written inside a language's line comments, so the core can stay syntax-agnostic.

/// Marker phrase opening a protected (read-only) span.
pub const BEGIN_READONLY: &str = "begin readonly";
/// Marker phrase closing a protected (read-only) span.
pub const END_READONLY: &str = "end readonly";
/// Marker phrase opening a named fold region.
pub const REGION_START: &str = "#region";
/// Marker phrase closing a named fold region.
pub const REGION_END: &str = "#endregion";

/// Comment tokens for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `--`, `//`, `#`).
    pub line: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports line comments with `token`.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Comment config for Ada / SPARK sources (`--`).
    pub fn ada() -> Self {
        Self::line("--")
    }

    /// Pick a comment config from a file extension, if known.
    pub fn for_extension(ext: &str) -> Option<Self> {
        match ext {
            "adb" | "ads" | "ada" | "gpr" => Some(Self::line("--")),
            "c" | "h" | "cc" | "cpp" | "hpp" | "rs" | "js" | "ts" | "java" => Some(Self::line("//")),
            "py" | "sh" | "toml" | "yaml" | "yml" => Some(Self::line("#")),
            _ => None,
        }
    }

    /// Pick a comment config from a file name's extension, if known.
    pub fn for_basename(basename: &str) -> Option<Self> {
        let (_, ext) = basename.rsplit_once('.')?;
        Self::for_extension(&ext.to_ascii_lowercase())
    }
}

/// The kind of a recognised marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// `begin readonly`
    BeginReadOnly,
    /// `end readonly`
    EndReadOnly,
    /// `#region NAME` (name may be empty)
    RegionStart(String),
    /// `#endregion NAME` (name may be empty)
    RegionEnd(String),
}

impl MarkerKind {
    /// Returns `true` for markers that open a span (`begin readonly`, `#region`).
    pub fn is_opening(&self) -> bool {
        matches!(self, Self::BeginReadOnly | Self::RegionStart(_))
    }
}

/// How markers are written for one language.
///
/// A marker line is a line whose trimmed text is a marker phrase, optionally preceded by the
/// configured line comment token. Text sharing a line with code is never a marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerSyntax {
    /// Comment tokens used to recognise commented markers.
    pub comments: CommentConfig,
}

impl MarkerSyntax {
    /// Create a marker syntax for the given comment config.
    pub fn new(comments: CommentConfig) -> Self {
        Self { comments }
    }

    /// The marker phrases searched for in a buffer, in no particular order.
    pub fn phrases(&self) -> [&'static str; 4] {
        [BEGIN_READONLY, END_READONLY, REGION_START, REGION_END]
    }

    /// Classify a full line of text.
    pub fn classify(&self, line: &str) -> Option<MarkerKind> {
        let mut body = line.trim();
        if let Some(token) = self.comments.line.as_deref().filter(|t| !t.is_empty())
            && let Some(rest) = body.strip_prefix(token)
        {
            body = rest.trim_start();
        }

        if body == BEGIN_READONLY {
            return Some(MarkerKind::BeginReadOnly);
        }
        if body == END_READONLY {
            return Some(MarkerKind::EndReadOnly);
        }
        if let Some(name) = marker_name(body, REGION_END) {
            return Some(MarkerKind::RegionEnd(name));
        }
        if let Some(name) = marker_name(body, REGION_START) {
            return Some(MarkerKind::RegionStart(name));
        }
        None
    }
}

fn marker_name(body: &str, phrase: &str) -> Option<String> {
    let rest = body.strip_prefix(phrase)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_commented_markers() {
        let syntax = MarkerSyntax::new(CommentConfig::ada());
        assert_eq!(
            syntax.classify("   -- begin readonly"),
            Some(MarkerKind::BeginReadOnly)
        );
        assert_eq!(syntax.classify("--end readonly  "), Some(MarkerKind::EndReadOnly));
        assert_eq!(
            syntax.classify("-- #region Contracts"),
            Some(MarkerKind::RegionStart("Contracts".to_string()))
        );
        assert_eq!(
            syntax.classify("-- #endregion Contracts"),
            Some(MarkerKind::RegionEnd("Contracts".to_string()))
        );
    }

    #[test]
    fn test_classify_rejects_code_and_lookalikes() {
        let syntax = MarkerSyntax::new(CommentConfig::ada());
        assert_eq!(syntax.classify("X := 1; -- begin readonly"), None);
        assert_eq!(syntax.classify("-- #regional office"), None);
        assert_eq!(syntax.classify("// begin readonly extra"), None);
    }

    #[test]
    fn test_classify_without_comment_token() {
        let syntax = MarkerSyntax::default();
        assert_eq!(syntax.classify("begin readonly"), Some(MarkerKind::BeginReadOnly));
        assert_eq!(
            syntax.classify("#endregion"),
            Some(MarkerKind::RegionEnd(String::new()))
        );
        assert!(MarkerKind::BeginReadOnly.is_opening());
        assert!(!MarkerKind::EndReadOnly.is_opening());
    }

    #[test]
    fn test_comment_config_for_extension() {
        assert_eq!(CommentConfig::for_extension("adb"), Some(CommentConfig::ada()));
        assert!(CommentConfig::for_extension("rs").is_some_and(|c| c.has_line()));
        assert_eq!(CommentConfig::for_extension("xyz"), None);
    }

    #[test]
    fn test_comment_config_for_basename() {
        assert_eq!(CommentConfig::for_basename("main.ADB"), Some(CommentConfig::ada()));
        assert_eq!(CommentConfig::for_basename("util.c"), Some(CommentConfig::line("//")));
        assert_eq!(CommentConfig::for_basename("Makefile"), None);
        assert_eq!(CommentConfig::for_basename("notes.txt"), None);
    }
}
