//! Match enumeration for one compiled definition inside scope regions.

use std::ops::Range;

use grep_matcher::Captures;
use grep_regex::RegexCaptures;

use crate::tools::matcher::PatternMatcher;

/// One reported match.
#[derive(Debug)]
pub struct MatchHit<'a> {
    /// Absolute byte span; the capture group's span in capture-group mode
    pub span: Range<usize>,
    /// Captures of the whole match, for template expansion
    pub captures: &'a RegexCaptures,
}

/// Search `haystack` for matches of `matcher` inside each of `regions`.
///
/// Regions are absolute byte ranges on char boundaries, sorted and disjoint.
/// Regex definitions see the haystack cut at the region end, so the longest
/// match inside the region wins; text before the region stays visible. For
/// literal definitions a match running past the end of its region is dropped
/// and ends that region. Empty matches advance the cursor by one char. In capture-group
/// mode, matches whose group did not participate are skipped.
///
/// Callback returns true to continue searching, false to stop.
pub fn search_regions(
    haystack: &str,
    matcher: &PatternMatcher,
    regions: &[Range<usize>],
    mut on_match: impl FnMut(MatchHit<'_>) -> bool,
) {
    let bytes = haystack.as_bytes();

    for region in regions {
        let end = region.end.min(bytes.len());
        let scoped = if matcher.is_regex() { &bytes[..end] } else { bytes };
        let mut cursor = region.start;

        while cursor <= end {
            let Some(caps) = matcher.captures_at(scoped, cursor) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            if whole.end() > end {
                break;
            }

            let span = match matcher.capture_group() {
                Some(group) => caps.get(group).map(|m| m.start()..m.end()),
                None => Some(whole.start()..whole.end()),
            };
            if let Some(span) = span {
                let hit = MatchHit {
                    span,
                    captures: &caps,
                };
                if !on_match(hit) {
                    return;
                }
            }

            cursor = if whole.is_empty() {
                if whole.end() >= bytes.len() {
                    break;
                }
                next_char_boundary(haystack, whole.end())
            } else {
                whole.end()
            };
        }
    }
}

fn next_char_boundary(haystack: &str, at: usize) -> usize {
    let mut next = at + 1;
    while !haystack.is_char_boundary(next) {
        next += 1;
    }
    next
}
