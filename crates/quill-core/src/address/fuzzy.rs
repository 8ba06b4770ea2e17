//! Symbolic ranges that may count from the end of a collection.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseFuzzyRangeError;

/// A location/length pair that allows negative values.
///
/// A negative `location` counts backwards from the end: `-1` is the position
/// after the last element. A negative `length` stops that many elements
/// before the end instead of extending forward from `location`.
///
/// Line addressing interprets `location` as **1-based**.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FuzzyRange {
    pub location: isize,
    pub length: isize,
}

impl FuzzyRange {
    #[inline]
    pub const fn new(location: isize, length: isize) -> Self {
        FuzzyRange { location, length }
    }
}

/// `location` alone when the length is 0 or 1, otherwise `location:length`.
impl fmt::Display for FuzzyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            0 | 1 => write!(f, "{}", self.location),
            length => write!(f, "{}:{}", self.location, length),
        }
    }
}

impl FromStr for FuzzyRange {
    type Err = ParseFuzzyRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseFuzzyRangeError(s.to_owned());

        let mut parts = s.split(':');
        let location = parts
            .next()
            .and_then(|p| p.parse::<isize>().ok())
            .ok_or_else(invalid)?;
        let length = match parts.next() {
            None => 0,
            Some(p) => p.parse::<isize>().map_err(|_| invalid())?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(FuzzyRange { location, length })
    }
}
