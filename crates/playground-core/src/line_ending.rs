//! Newline handling.
//!
//! Buffers hold LF (`'\n'`) text only. CRLF sources are normalized when a [`Document`] is built
//! and converted back when their contents leave the workspace.
//!
//! [`Document`]: crate::Document

/// Newline sequence of a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `'\n'`
    #[default]
    Lf,
    /// `"\r\n"`
    Crlf,
}

impl LineEnding {
    /// `Crlf` if `text` contains any `"\r\n"`, `Lf` otherwise.
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Replace every `"\r\n"` with `'\n'`. Lone `'\r'` characters are kept.
    pub fn normalize(text: &str) -> String {
        text.replace("\r\n", "\n")
    }

    /// Convert LF text to this line ending.
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }
}
