use thiserror::Error;

/// Failures of fuzzy range and location addressing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    #[error("the range (location: {location}, length: {length}) is out of the text")]
    InvalidRange { location: isize, length: isize },

    #[error("The line number {0} is out of the range.")]
    InvalidLine(isize),

    #[error("The column number {0} is out of the range.")]
    InvalidColumn(isize),
}

/// A replacement definition that cannot be turned into a matcher.
///
/// `index` is the position of the definition in its `MultipleReplace`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("definition {index}: empty find string")]
    EmptyFindString { index: usize },

    #[error("definition {index}: invalid regular expression: {reason}")]
    InvalidRegex { index: usize, reason: String },

    #[error("definition {index}: capture group {group} requested but the pattern has {available} groups")]
    MissingCaptureGroup {
        index: usize,
        group: usize,
        available: usize,
    },
}

impl PatternError {
    /// Index of the offending definition.
    pub fn index(&self) -> usize {
        match self {
            PatternError::EmptyFindString { index }
            | PatternError::InvalidRegex { index, .. }
            | PatternError::MissingCaptureGroup { index, .. } => *index,
        }
    }

    pub(crate) fn with_index(self, index: usize) -> Self {
        match self {
            PatternError::EmptyFindString { .. } => PatternError::EmptyFindString { index },
            PatternError::InvalidRegex { reason, .. } => PatternError::InvalidRegex { index, reason },
            PatternError::MissingCaptureGroup {
                group, available, ..
            } => PatternError::MissingCaptureGroup {
                index,
                group,
                available,
            },
        }
    }
}

/// Text form of a fuzzy range could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fuzzy range: {0:?}")]
pub struct ParseFuzzyRangeError(pub String);

/// Canonical errors for quill core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // -------- Addressing --------
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    ParseFuzzyRange(#[from] ParseFuzzyRangeError),

    // -------- Find / Replace --------
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
