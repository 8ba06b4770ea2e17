//! tools/model.rs: range primitives shared by addressing, damage tracking and find/replace
//!
//! CharRange: half-open `[location, location + length)` in chars
//! MatchResult: one match attributed to the definition that produced it

use std::{
    cmp::{max, min},
    ops::Range,
};

use crate::error::{AddressError, Error};

/// Half-open character range `[location, location + length)`.
///
/// Invariants:
/// - Units are **chars** (Unicode scalar values), not bytes.
/// - `location + length` never overflows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CharRange {
    pub location: usize,
    pub length: usize,
}

/// One match found by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchResult {
    pub range: CharRange,
    /// Index of the definition in its `MultipleReplace`.
    pub pattern_index: usize,
}

impl CharRange {
    #[inline]
    pub const fn new(location: usize, length: usize) -> Self {
        CharRange { location, length }
    }

    /// Empty range at `location`.
    #[inline]
    pub const fn empty(location: usize) -> Self {
        CharRange {
            location,
            length: 0,
        }
    }

    /// Range from `start` to `end`; `None` if `end < start`.
    #[inline]
    pub fn from_bounds(start: usize, end: usize) -> Option<Self> {
        Some(CharRange {
            location: start,
            length: end.checked_sub(start)?,
        })
    }

    /// Exclusive upper bound.
    #[inline]
    #[must_use]
    pub fn end(self) -> usize {
        self.location + self.length
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    /// True if `pos` lies in the range or on one of its bounds.
    #[inline]
    #[must_use]
    pub fn touches_offset(self, pos: usize) -> bool {
        self.location <= pos && pos <= self.end()
    }

    /// True if the ranges overlap or touch each other.
    ///
    /// Empty ranges touch whatever they sit on or next to.
    #[inline]
    #[must_use]
    pub fn touches(self, other: &CharRange) -> bool {
        self.touches_offset(other.location) || other.touches_offset(self.location)
    }

    /// Union when overlapping **or touching**; otherwise `None`.
    #[inline]
    #[must_use]
    pub fn union_closed(self, other: &CharRange) -> Option<CharRange> {
        self.touches(other).then(|| self.join_covering(other))
    }

    /// Covering join (always): from `min(start)` to `max(end)`.
    #[inline]
    #[must_use]
    pub fn join_covering(self, other: &CharRange) -> CharRange {
        let location = min(self.location, other.location);
        CharRange {
            location,
            length: max(self.end(), other.end()) - location,
        }
    }

    /// Shift the location by signed `delta`, saturating at 0.
    #[inline]
    #[must_use]
    pub fn shifted(self, delta: isize) -> CharRange {
        CharRange {
            location: self.location.saturating_add_signed(delta),
            length: self.length,
        }
    }

    /// Grow (or shrink) the length by signed `delta`, saturating at 0.
    #[inline]
    #[must_use]
    pub fn resized(self, delta: isize) -> CharRange {
        CharRange {
            location: self.location,
            length: self.length.saturating_add_signed(delta),
        }
    }

    /// Clamp both ends into `[0, len]`.
    #[inline]
    #[must_use]
    pub fn clamped(self, len: usize) -> CharRange {
        let location = min(self.location, len);
        CharRange {
            location,
            length: min(self.end(), len) - location,
        }
    }

    #[inline]
    #[must_use]
    pub fn to_range(self) -> Range<usize> {
        self.location..self.end()
    }

    /// The minimal range covering every given range, or `None` for no ranges.
    pub fn covering<I>(ranges: I) -> Option<CharRange>
    where
        I: IntoIterator<Item = CharRange>,
    {
        ranges.into_iter().reduce(|acc, r| acc.join_covering(&r))
    }

    /// Sort the ranges and merge every touching or overlapping pair.
    pub fn merged<I>(ranges: I) -> Vec<CharRange>
    where
        I: IntoIterator<Item = CharRange>,
    {
        let mut sorted: Vec<CharRange> = ranges.into_iter().collect();
        sorted.sort_by_key(|r| (r.location, r.length));

        let mut out: Vec<CharRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match out.last_mut() {
                Some(last) if last.touches(&range) => *last = last.join_covering(&range),
                _ => out.push(range),
            }
        }
        out
    }
}

impl TryFrom<Range<usize>> for CharRange {
    type Error = Error;

    #[inline]
    fn try_from(r: Range<usize>) -> Result<Self, Self::Error> {
        CharRange::from_bounds(r.start, r.end).ok_or_else(|| {
            AddressError::InvalidRange {
                location: r.start as isize,
                length: r.end as isize - r.start as isize,
            }
            .into()
        })
    }
}

impl From<CharRange> for Range<usize> {
    #[inline]
    fn from(r: CharRange) -> Self {
        r.to_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn r(range: Range<usize>) -> CharRange {
        CharRange::try_from(range).unwrap()
    }

    #[test]
    fn test_touches() {
        assert!(r(2..3).touches(&r(3..4)));
        assert!(r(2..3).touches(&r(2..3)));
        assert!(r(3..3).touches(&r(2..3)));
        assert!(!r(2..3).touches(&r(4..5)));
        assert!(r(2..5).touches_offset(5));
        assert!(!r(2..5).touches_offset(6));
    }

    #[test]
    fn test_union_closed() {
        assert_eq!(r(2..3).union_closed(&r(3..4)), Some(r(2..4)));
        assert_eq!(r(2..3).union_closed(&r(5..6)), None);
        assert_eq!(r(2..3).join_covering(&r(5..6)), r(2..6));
    }

    #[test]
    fn test_covering() {
        assert_eq!(CharRange::covering(Vec::new()), None);
        assert_eq!(CharRange::covering([r(0..0)]), Some(r(0..0)));
        assert_eq!(CharRange::covering([r(1..1)]), Some(r(1..1)));
        assert_eq!(CharRange::covering([r(1..3), r(2..4)]), Some(r(1..4)));
        assert_eq!(CharRange::covering([r(1..3), r(5..9)]), Some(r(1..9)));
        assert_eq!(CharRange::covering([r(5..9), r(1..3)]), Some(r(1..9)));
        assert_eq!(
            CharRange::covering([r(5..100), r(1..3), r(2..3)]),
            Some(r(1..100))
        );
        // absent entries are filtered before covering
        let ranges = [Some(r(5..9)), None, Some(r(1..3))];
        assert_eq!(CharRange::covering(ranges.into_iter().flatten()), Some(r(1..9)));
    }

    #[test]
    fn test_merged() {
        assert_eq!(CharRange::merged([r(1..2), r(2..3)]), vec![r(1..3)]);
        assert_eq!(CharRange::merged([r(1..3), r(2..3)]), vec![r(1..3)]);
        assert_eq!(
            CharRange::merged([r(1..2), r(3..4)]),
            vec![r(1..2), r(3..4)]
        );
        assert_eq!(CharRange::merged([r(1..2), r(3..4), r(1..3)]), vec![r(1..4)]);
    }

    #[test]
    fn test_shift_saturating() {
        assert_eq!(r(4..6).shifted(-2), r(2..4));
        assert_eq!(r(1..3).shifted(-5), r(0..2));
        assert_eq!(r(1..3).resized(-5), r(1..1));
        assert_eq!(r(4..12).clamped(8), r(4..8));
    }

    quickcheck! {
        fn prop_merged_is_sorted_and_disjoint(raw: Vec<(u8, u8)>) -> bool {
            let ranges = raw
                .into_iter()
                .map(|(loc, len)| CharRange::new(loc as usize, len as usize));
            let merged = CharRange::merged(ranges);
            merged.windows(2).all(|w| w[0].end() < w[1].location)
        }
    }
}
