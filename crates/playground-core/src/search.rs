//! Literal phrase search.
//!
//! Marker phrases are located with an escaped regex over the whole buffer text. Results are
//! half-open **character** ranges, not byte ranges.

use regex::Regex;

/// A match expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The escaped phrase failed to compile (it exceeds the regex size limit).
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Byte-to-char mapping for one text, built once per search.
struct CharIndex {
    char_to_byte: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_offset) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

/// Find every non-overlapping occurrence of `phrase` in `text`, in order.
///
/// An empty phrase matches nothing.
pub fn find_all(text: &str, phrase: &str) -> Result<Vec<SearchMatch>, SearchError> {
    if phrase.is_empty() {
        return Ok(Vec::new());
    }

    let re = Regex::new(&regex::escape(phrase))?;
    let index = CharIndex::new(text);
    Ok(re
        .find_iter(text)
        .map(|m| SearchMatch {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        })
        .filter(|m| !m.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all_char_offsets() {
        let text = "é begin readonly\nbegin readonly";
        let matches = find_all(text, "begin readonly").unwrap();
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 2, end: 16 },
                SearchMatch { start: 17, end: 31 }
            ]
        );
    }

    #[test]
    fn test_find_all_escapes_phrase() {
        assert_eq!(find_all("a.b axb a.b", "a.b").unwrap().len(), 2);
    }

    #[test]
    fn test_find_all_empty_phrase() {
        assert!(find_all("abc", "").unwrap().is_empty());
    }
}
