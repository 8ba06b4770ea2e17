pub mod address;
pub mod damage;
pub mod definition;
pub mod error;
pub mod multi_replace;
pub mod tools;

pub use address::{
    require_char_range, resolve_char_range, resolve_cursor, resolve_line_range,
    resolve_line_range_in, FuzzyRange,
};
pub use damage::EditedRangeSet;
pub use definition::{InvalidPatternPolicy, PatternOptions, ReplaceSettings, Replacement};
pub use error::{AddressError, Error, ParseFuzzyRangeError, PatternError, Result};
pub use multi_replace::{MultipleReplace, ReplaceResult};
pub use tools::{
    CharRange, FindAction, FindProgress, FindSummary, LineIndex, LineSpan, MatchResult,
    ProgressSnapshot,
};

pub mod prelude {
    //! Common imports for consumers of this crate.
    pub use super::{
        resolve_char_range, resolve_cursor, resolve_line_range, AddressError, CharRange,
        EditedRangeSet, Error, FindAction, FindProgress, FindSummary, FuzzyRange, MatchResult,
        MultipleReplace, PatternError, ReplaceResult, ReplaceSettings, Replacement, Result,
    };
}
