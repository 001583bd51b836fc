use serde::{Deserialize, Serialize};

use crate::id::KeywordId;

/// An authored keyword span inside a content block's text.
///
/// Keyword spans are half-open: `start` is the first character and `end` is
/// one past the last. A span with `start >= end` is empty and can never be
/// covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Identifier referenced by rules.
    pub id: KeywordId,
    /// First character (inclusive).
    pub start: usize,
    /// One past the last character (exclusive).
    pub end: usize,
}

impl Keyword {
    /// Create a keyword over `[start, end)`.
    pub fn new(id: impl Into<KeywordId>, start: usize, end: usize) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    /// Number of characters in the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span contains no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Character indices covered by the span.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end.max(self.start)
    }

    /// Whether the span fits inside a text of `text_len` characters.
    pub fn fits(&self, text_len: usize) -> bool {
        self.end <= text_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_length() {
        let kw = Keyword::new("k", 0, 4);
        assert_eq!(kw.len(), 4);
        assert_eq!(kw.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(kw.fits(4));
        assert!(!kw.fits(3));
    }

    #[test]
    fn inverted_span_is_empty() {
        let kw = Keyword::new("k", 5, 2);
        assert!(kw.is_empty());
        assert_eq!(kw.len(), 0);
        assert_eq!(kw.indices().count(), 0);
    }
}
