//! Conversion between char offsets and UTF-8 byte offsets of a text snapshot.

use crate::tools::model::CharRange;

/// Char ↔ byte offset table for one snapshot.
///
/// ASCII text needs no table: both units coincide.
#[derive(Debug, Clone)]
pub struct CharIndex {
    // byte offset of every char; `None` when the text is ASCII
    char_starts: Option<Vec<usize>>,
    total_bytes: usize,
    total_chars: usize,
}

impl CharIndex {
    /// Build by scanning `text` once. Rebuild whenever the text changes.
    pub fn build(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                char_starts: None,
                total_bytes: text.len(),
                total_chars: text.len(),
            };
        }
        let starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        Self {
            total_chars: starts.len(),
            char_starts: Some(starts),
            total_bytes: text.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    #[inline]
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Byte offset of char `ch`; offsets past the end map to the byte length.
    #[inline]
    pub fn byte_of_char(&self, ch: usize) -> usize {
        match &self.char_starts {
            None => ch.min(self.total_bytes),
            Some(starts) => starts.get(ch).copied().unwrap_or(self.total_bytes),
        }
    }

    /// Char offset of the char boundary `byte`.
    ///
    /// A byte inside a multi-byte char maps to the char containing it.
    #[inline]
    pub fn char_of_byte(&self, byte: usize) -> usize {
        match &self.char_starts {
            None => byte.min(self.total_chars),
            Some(starts) => {
                if byte >= self.total_bytes {
                    return self.total_chars;
                }
                starts.partition_point(|&s| s <= byte).saturating_sub(1)
            }
        }
    }

    /// Char range → byte range (half-open), clamped to the text.
    #[inline]
    pub fn byte_range_of(&self, range: CharRange) -> std::ops::Range<usize> {
        self.byte_of_char(range.location)..self.byte_of_char(range.end())
    }

    /// Byte bounds → char range.
    #[inline]
    pub fn char_range_of(&self, start: usize, end: usize) -> CharRange {
        let location = self.char_of_byte(start);
        CharRange::new(location, self.char_of_byte(end) - location)
    }
}
