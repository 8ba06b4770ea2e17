use crate::tools::model::CharRange;

/// One line of a text snapshot.
///
/// - `line` is **1-based**.
/// - `span` covers the line **including** its line ending.
/// - `content` covers the line **without** its line ending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub line: usize,
    pub span: CharRange,
    pub content: CharRange,
}

/// Line-ending sequences recognized when splitting lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEnding {
    /// U+000A
    Lf,
    /// U+000D
    Cr,
    /// U+000D U+000A
    Crlf,
    /// U+0085
    Nel,
    /// U+2028
    LineSeparator,
    /// U+2029
    ParagraphSeparator,
}

impl LineEnding {
    #[inline]
    pub const fn from_char(ch: char) -> Option<LineEnding> {
        match ch {
            '\u{000A}' => Some(LineEnding::Lf),
            '\u{000D}' => Some(LineEnding::Cr),
            '\u{0085}' => Some(LineEnding::Nel),
            '\u{2028}' => Some(LineEnding::LineSeparator),
            '\u{2029}' => Some(LineEnding::ParagraphSeparator),
            _ => None,
        }
    }

    #[inline]
    pub const fn len_chars(self) -> usize {
        match self {
            LineEnding::Crlf => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineIndex {
    // strictly ordered; never empty; the last line has no line ending
    lines: Vec<LineSpan>,
    total_chars: usize,
}

impl LineIndex {
    /// Build by scanning every char once. Rebuild only when the text changes.
    ///
    /// A text ending with a line ending has one more, empty, final line.
    pub fn build(text: &str) -> Self {
        let mut lines = Vec::with_capacity(16);
        let mut chars = text.chars().peekable();
        let mut pos = 0usize;
        let mut start = 0usize;

        while let Some(ch) = chars.next() {
            let Some(mut ending) = LineEnding::from_char(ch) else {
                pos += 1;
                continue;
            };
            if ending == LineEnding::Cr && chars.peek() == Some(&'\n') {
                chars.next();
                ending = LineEnding::Crlf;
            }
            let end = pos + ending.len_chars();
            lines.push(LineSpan {
                line: lines.len() + 1,
                span: CharRange::new(start, end - start),
                content: CharRange::new(start, pos - start),
            });
            pos = end;
            start = end;
        }

        lines.push(LineSpan {
            line: lines.len() + 1,
            span: CharRange::new(start, pos - start),
            content: CharRange::new(start, pos - start),
        });

        Self {
            lines,
            total_chars: pos,
        }
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Get the given line (1-based).
    #[inline]
    pub fn line(&self, line: usize) -> Option<LineSpan> {
        self.lines.get(line.checked_sub(1)?).copied()
    }

    /// Inclusive 1-based line range → char range, with or without the last line ending.
    pub fn span_of_lines(
        &self,
        start_line: usize,
        end_line: usize,
        including_line_ending: bool,
    ) -> Option<CharRange> {
        if end_line < start_line {
            return None;
        }
        let first = self.line(start_line)?;
        let last = self.line(end_line)?;
        let end = if including_line_ending {
            last.span.end()
        } else {
            last.content.end()
        };
        CharRange::from_bounds(first.span.location, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_line_endings() {
        let index = LineIndex::build("a\r\nb\rc\nd\u{2028}e\u{85}f");
        let contents: Vec<_> = (1..=6)
            .filter_map(|n| index.line(n))
            .map(|l| l.content)
            .collect();
        assert_eq!(index.line_count(), 6);
        assert_eq!(contents[0], CharRange::new(0, 1));
        assert_eq!(index.line(1).unwrap().span, CharRange::new(0, 3));
        assert_eq!(contents[1], CharRange::new(3, 1));
        assert_eq!(contents[5], CharRange::new(11, 1));
        assert_eq!(index.line(7), None);
        assert_eq!(index.total_chars(), 12);
    }

    #[test]
    fn test_trailing_line_ending_adds_empty_line() {
        let index = LineIndex::build("1\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line(2).unwrap().span, CharRange::new(2, 0));

        let index = LineIndex::build("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line(1).unwrap().span, CharRange::new(0, 0));
    }

    #[test]
    fn test_span_of_lines() {
        let index = LineIndex::build("1\r\n2\r\n3");
        assert_eq!(index.span_of_lines(1, 2, true), Some(CharRange::new(0, 6)));
        assert_eq!(index.span_of_lines(1, 2, false), Some(CharRange::new(0, 4)));
        assert_eq!(index.span_of_lines(2, 1, true), None);
        assert_eq!(index.span_of_lines(0, 1, true), None);
    }
}
