pub mod escape;
pub mod line_index;
pub mod matcher;
pub mod model;
pub mod offsets;
pub mod progress;
pub mod replace;
pub mod search;

pub use escape::unescape;
pub use line_index::{LineEnding, LineIndex, LineSpan};
pub use matcher::PatternMatcher;
pub use model::{CharRange, MatchResult};
pub use offsets::CharIndex;
pub use progress::{FindAction, FindProgress, FindSummary, ProgressObserver, ProgressSnapshot};
pub use replace::{apply_plan, map_pos, map_range, plan_in_text, Assoc, CharEdit, EditOp, ReplacePlan};
pub use search::{search_regions, MatchHit};
