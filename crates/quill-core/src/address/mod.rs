//! Fuzzy range addressing.
//!
//! Resolves [`FuzzyRange`] values, which may count from the end, into
//! absolute [`CharRange`]s over a text snapshot. All offsets are chars.
//! Nothing here panics on out-of-bounds input: character and line ranges
//! resolve to `None`, cursor locations to an [`AddressError`].

pub mod fuzzy;

pub use fuzzy::FuzzyRange;

use crate::error::AddressError;
use crate::tools::line_index::LineIndex;
use crate::tools::model::CharRange;

/// Resolve `range` against a collection of `count` elements.
fn resolve_in_count(count: usize, range: FuzzyRange) -> Option<CharRange> {
    let whole = isize::try_from(count).ok()?;
    let location = if range.location >= 0 {
        range.location
    } else {
        whole.checked_add(range.location)?.checked_add(1)?
    };
    let length = if range.length >= 0 {
        range.length
    } else {
        whole.checked_sub(location)?.checked_add(range.length)?
    };

    if location < 0 || length < 0 || location > whole {
        return None;
    }

    let location = location as usize;
    Some(CharRange::new(
        location,
        (length as usize).min(count - location),
    ))
}

/// Convert a fuzzy character range to an absolute range in `text`.
///
/// e.g. `FuzzyRange::new(3, -1)` over a 10-char text is `3..9`.
/// Returns `None` if the range falls outside the text.
pub fn resolve_char_range(text: &str, range: FuzzyRange) -> Option<CharRange> {
    resolve_in_count(text.chars().count(), range)
}

/// Like [`resolve_char_range`] but reports failure as [`AddressError::InvalidRange`].
pub fn require_char_range(text: &str, range: FuzzyRange) -> Result<CharRange, AddressError> {
    resolve_char_range(text, range).ok_or(AddressError::InvalidRange {
        location: range.location,
        length: range.length,
    })
}

/// Char range of the fuzzily specified lines of `text`.
///
/// `range.location` is 1-based. Location `0` gives the empty range at the
/// start; a location past the last line gives the empty range at the end.
pub fn resolve_line_range(
    text: &str,
    range: FuzzyRange,
    including_line_ending: bool,
) -> Option<CharRange> {
    resolve_line_range_in(&LineIndex::build(text), range, including_line_ending)
}

/// [`resolve_line_range`] over a prebuilt [`LineIndex`].
pub fn resolve_line_range_in(
    index: &LineIndex,
    range: FuzzyRange,
    including_line_ending: bool,
) -> Option<CharRange> {
    let count = isize::try_from(index.line_count()).ok()?;

    if range.location == 0 {
        return Some(CharRange::empty(0));
    }
    if range.location > count {
        return Some(CharRange::empty(index.total_chars()));
    }

    // 1-based to 0-based
    let start = if range.location > 0 {
        range.location - 1
    } else {
        count.checked_add(range.location)?
    };
    let span = match range.length {
        0 => 0,
        length if length > 0 => length - 1,
        length => count.checked_sub(start)?.checked_add(length)?.checked_sub(1)?,
    };
    let end = start.checked_add(span)?;

    if start < 0 || end < start || end >= count {
        return None;
    }

    index.span_of_lines(
        start as usize + 1,
        end as usize + 1,
        including_line_ending,
    )
}

/// Cursor offset for a fuzzily specified line and column.
///
/// `line` is 1-based and `0` is treated as `1`. `column` counts chars within
/// the line content and may be negative (`-1` is the end of the line).
pub fn resolve_cursor(text: &str, line: isize, column: isize) -> Result<usize, AddressError> {
    let index = LineIndex::build(text);
    let line_range = FuzzyRange::new(if line == 0 { 1 } else { line }, 0);
    let content = resolve_line_range_in(&index, line_range, false)
        .ok_or(AddressError::InvalidLine(line))?;

    let in_line = resolve_in_count(content.length, FuzzyRange::new(column, 0))
        .ok_or(AddressError::InvalidColumn(column))?;

    Ok(content.location + in_line.location)
}
