//! replace.rs: build and apply a staged replace plan over a text snapshot,
//! and carry caller ranges across it.

use std::ops::Range;

use crate::tools::matcher::PatternMatcher;
use crate::tools::model::CharRange;
use crate::tools::offsets::CharIndex;
use crate::tools::search::{search_regions, MatchHit};

/// One concrete edit to apply to the haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    /// Absolute byte range to replace (half-open).
    pub span: Range<usize>,
    /// Replacement text for this span.
    pub replacement: String,
}

/// A set of non-overlapping, start-sorted edits.
#[derive(Debug, Clone, Default)]
pub struct ReplacePlan {
    pub ops: Vec<EditOp>,
}

impl ReplacePlan {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// The plan's edits in chars, against the text `index` was built from.
    pub fn char_edits(&self, index: &CharIndex) -> Vec<CharEdit> {
        self.ops
            .iter()
            .map(|op| CharEdit {
                old: index.char_range_of(op.span.start, op.span.end),
                new_length: op.replacement.chars().count(),
            })
            .collect()
    }
}

/// An edit in char units: `old` is replaced by `new_length` chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEdit {
    pub old: CharRange,
    pub new_length: usize,
}

impl CharEdit {
    #[inline]
    fn delta(&self) -> isize {
        self.new_length as isize - self.old.length as isize
    }
}

/// Build a replace plan for every match of `matcher` inside `regions` of `text`.
pub fn plan_in_text(text: &str, matcher: &PatternMatcher, regions: &[Range<usize>]) -> ReplacePlan {
    let mut ops: Vec<EditOp> = Vec::new();
    let mut tmp = Vec::<u8>::with_capacity(128);

    search_regions(text, matcher, regions, |hit: MatchHit<'_>| {
        tmp.clear();
        matcher.expand(hit.captures, text.as_bytes(), &mut tmp);
        ops.push(EditOp {
            span: hit.span,
            replacement: String::from_utf8_lossy(&tmp).into_owned(),
        });
        true
    });

    // Matches are searched left to right from the end of the previous one and
    // regions are disjoint, so edits never overlap.
    #[cfg(debug_assertions)]
    {
        for i in 1..ops.len() {
            if ops[i].span.start < ops[i - 1].span.end {
                panic!(
                    "Unexpected overlap: op[{}] starts at {} but op[{}] ends at {}",
                    i,
                    ops[i].span.start,
                    i - 1,
                    ops[i - 1].span.end
                );
            }
        }
    }

    ReplacePlan { ops }
}

/// Apply a previously built plan to `haystack` in a single pass.
///
/// If the plan is empty, returns a copy of the input.
pub fn apply_plan(haystack: &str, plan: &ReplacePlan) -> String {
    if plan.ops.is_empty() {
        return haystack.to_owned();
    }

    let bytes = haystack.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut cursor = 0usize;
    for op in &plan.ops {
        if op.span.start > cursor {
            out.extend_from_slice(&bytes[cursor..op.span.start]);
        }
        out.extend_from_slice(op.replacement.as_bytes());
        cursor = op.span.end;
    }

    if cursor < bytes.len() {
        out.extend_from_slice(&bytes[cursor..]);
    }
    match String::from_utf8(out) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Which side of an edit a position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay before inserted text; collapse to the start of a replacement.
    Before,
    /// Move after inserted text; collapse to the end of a replacement.
    After,
}

/// Map a char position through start-sorted, non-overlapping edits.
pub fn map_pos(pos: usize, edits: &[CharEdit], assoc: Assoc) -> usize {
    let mut delta = 0isize;

    for edit in edits {
        let start = edit.old.location;
        let end = edit.old.end();

        if pos < start {
            break;
        }
        let new_start = start.saturating_add_signed(delta);

        if edit.old.is_empty() && pos == start {
            return match assoc {
                Assoc::Before => new_start,
                Assoc::After => new_start + edit.new_length,
            };
        }
        if pos == start {
            return new_start;
        }
        if pos < end {
            return match assoc {
                Assoc::Before => new_start,
                Assoc::After => new_start + edit.new_length,
            };
        }
        delta += edit.delta();
    }

    pos.saturating_add_signed(delta)
}

/// Map a caller range through edits. The start sticks before, the end after.
pub fn map_range(range: CharRange, edits: &[CharEdit]) -> CharRange {
    let start = map_pos(range.location, edits, Assoc::Before);
    if range.is_empty() {
        return CharRange::empty(start);
    }
    let end = map_pos(range.end(), edits, Assoc::After).max(start);
    CharRange::new(start, end - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Replacement, ReplaceSettings};

    fn plan(text: &str, replacement: &Replacement) -> ReplacePlan {
        let matcher = PatternMatcher::compile(replacement, &ReplaceSettings::default()).unwrap();
        plan_in_text(text, &matcher, &[0..text.len()])
    }

    fn edit(location: usize, length: usize, new_length: usize) -> CharEdit {
        CharEdit {
            old: CharRange::new(location, length),
            new_length,
        }
    }

    #[test]
    fn test_plan_and_apply() {
        let text = "banana";
        let plan = plan(text, &Replacement::new("a", ""));
        assert_eq!(plan.len(), 3);
        assert_eq!(apply_plan(text, &plan), "bnn");
    }

    #[test]
    fn test_apply_expands_captures() {
        let text = "me@home, you@work";
        let plan = plan(text, &Replacement::regex(r"(\w+)@(\w+)", "$2:$1"));
        assert_eq!(apply_plan(text, &plan), "home:me, work:you");
    }

    #[test]
    fn test_empty_plan_is_identity() {
        let text = "nothing here";
        let plan = plan(text, &Replacement::new("zzz", "y"));
        assert!(plan.is_empty());
        assert_eq!(apply_plan(text, &plan), text);
    }

    #[test]
    fn test_char_edits_count_chars() {
        let text = "café au lait";
        let plan = plan(text, &Replacement::new("é", "ee"));
        let edits = plan.char_edits(&CharIndex::build(text));
        assert_eq!(edits, vec![edit(3, 1, 2)]);
    }

    #[test]
    fn test_map_pos() {
        let edits = [edit(2, 3, 1), edit(8, 0, 2)];

        assert_eq!(map_pos(1, &edits, Assoc::Before), 1);
        assert_eq!(map_pos(2, &edits, Assoc::After), 2);
        assert_eq!(map_pos(3, &edits, Assoc::Before), 2);
        assert_eq!(map_pos(3, &edits, Assoc::After), 3);
        assert_eq!(map_pos(5, &edits, Assoc::Before), 3);
        assert_eq!(map_pos(7, &edits, Assoc::Before), 5);

        // insertion at the position
        assert_eq!(map_pos(8, &edits, Assoc::Before), 6);
        assert_eq!(map_pos(8, &edits, Assoc::After), 8);
        assert_eq!(map_pos(10, &edits, Assoc::After), 10);
    }

    #[test]
    fn test_map_range() {
        // "abcdefg abcdefg abcdefg" with "abc" -> "_"
        let edits = [edit(0, 3, 1), edit(8, 3, 1), edit(16, 3, 1)];
        // a start inside a replaced match collapses to its new start
        assert_eq!(map_range(CharRange::new(1, 14), &edits), CharRange::new(0, 11));

        let edits = [edit(8, 3, 1), edit(16, 3, 1)];
        assert_eq!(map_range(CharRange::new(1, 14), &edits), CharRange::new(1, 12));
        assert_eq!(map_range(CharRange::new(16, 7), &edits), CharRange::new(14, 5));

        // swallowed entirely
        assert_eq!(map_range(CharRange::new(9, 1), &edits), CharRange::new(8, 1));
        assert_eq!(map_range(CharRange::new(9, 0), &edits), CharRange::empty(8));
    }
}
