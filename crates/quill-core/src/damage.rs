//! Edited-range (damage) tracking.
//!
//! [`EditedRangeSet`] folds edit notifications into the minimal set of char
//! ranges that need to be re-derived (re-tokenized, re-highlighted...) after a
//! sequence of edits.
//!
//! Invariants:
//! - Ranges are sorted by location.
//! - No two ranges overlap or touch; touching ranges are always merged.

use crate::tools::model::CharRange;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditedRangeSet {
    ranges: Vec<CharRange>,
}

impl EditedRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set starting with `range` already edited, typically the whole text.
    pub fn with_range(range: CharRange) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    #[inline]
    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Replace the whole set with `range`.
    pub fn reset(&mut self, range: CharRange) {
        self.ranges.clear();
        self.ranges.push(range);
    }

    /// Minimal range from the first range's start to the last range's end.
    pub fn covering_range(&self) -> Option<CharRange> {
        let first = self.ranges.first()?;
        let last = self.ranges.last()?;
        CharRange::from_bounds(first.location, last.end())
    }

    /// Flatten the set into its covering range.
    pub fn compact(&mut self) {
        if let Some(covering) = self.covering_range() {
            self.reset(covering);
        }
    }

    /// Record an edit.
    ///
    /// `edited` is the post-edit range and `change_in_length` the net change
    /// in text length, so the pre-edit footprint is
    /// `{edited.location, edited.length - change_in_length}`.
    ///
    /// # Panics
    ///
    /// Panics if `edited.location + edited.length` overflows.
    pub fn append(&mut self, edited: CharRange, change_in_length: isize) {
        assert!(
            edited.location.checked_add(edited.length).is_some(),
            "edited range {edited:?} overflows"
        );
        let prior_length = edited.length as isize - change_in_length;
        debug_assert!(
            prior_length >= 0,
            "edited range {edited:?} is shorter than its change {change_in_length}"
        );
        let prior = CharRange::new(edited.location, prior_length.max(0) as usize);

        let mut folded: Vec<CharRange> = Vec::with_capacity(self.ranges.len() + 1);
        let mut union = prior;
        let mut absorbed = false;
        let mut emitted = false;

        for &range in &self.ranges {
            if range.end() < prior.location {
                folded.push(range);
            } else if range.touches(&prior) {
                union = union.join_covering(&range);
                absorbed = true;
            } else {
                if !emitted {
                    push_coalesced(&mut folded, Self::landing(edited, union, absorbed, change_in_length));
                    emitted = true;
                }
                folded.push(range.shifted(change_in_length));
            }
        }
        if !emitted {
            push_coalesced(&mut folded, Self::landing(edited, union, absorbed, change_in_length));
        }

        log::trace!(
            "damage: {edited:?} ({change_in_length:+}) folded {} ranges into {}",
            self.ranges.len(),
            folded.len()
        );
        self.ranges = folded;
    }

    fn landing(edited: CharRange, union: CharRange, absorbed: bool, delta: isize) -> CharRange {
        if absorbed {
            union.resized(delta)
        } else {
            edited
        }
    }
}

fn push_coalesced(ranges: &mut Vec<CharRange>, range: CharRange) {
    match ranges.last().and_then(|last| last.union_closed(&range)) {
        Some(union) => {
            if let Some(last) = ranges.last_mut() {
                *last = union;
            }
        }
        None => ranges.push(range),
    }
}
