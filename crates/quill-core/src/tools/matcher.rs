use std::borrow::Cow;

use grep_matcher::{Captures as _, Matcher};
use grep_regex::{RegexCaptures, RegexMatcher as GrepMatcher, RegexMatcherBuilder};

use crate::definition::{Replacement, ReplaceSettings};
use crate::error::PatternError;
use crate::tools::escape::unescape;

/// Compiled form of one [`Replacement`].
///
/// Literal patterns are escaped and go through the same regex engine, so
/// case folding and whole-word matching behave identically in both modes.
pub struct PatternMatcher {
    inner: GrepMatcher,
    is_regex: bool,
    capture_group: Option<usize>,
    template: String,
}

impl PatternMatcher {
    /// Compile a definition into a matcher.
    ///
    /// Errors carry index 0; callers holding a definition list re-index them.
    pub fn compile(
        replacement: &Replacement,
        settings: &ReplaceSettings,
    ) -> Result<Self, PatternError> {
        let opts = &replacement.options;

        if replacement.search_pattern.is_empty() {
            return Err(PatternError::EmptyFindString { index: 0 });
        }

        let pattern: Cow<'_, str> = if opts.uses_regular_expression {
            Cow::Borrowed(&replacement.search_pattern)
        } else {
            Cow::Owned(regex::escape(&replacement.search_pattern))
        };

        let mut b = RegexMatcherBuilder::new();
        b.case_insensitive(!opts.is_case_sensitive)
            .unicode(true)
            .word(opts.matches_whole_word)
            .multi_line(settings.anchors_match_lines)
            .dot_matches_new_line(settings.dot_matches_new_line);

        let inner = b.build(&pattern).map_err(|e| PatternError::InvalidRegex {
            index: 0,
            reason: e.to_string(),
        })?;

        let template = if opts.uses_regular_expression && settings.unescapes_replacement {
            unescape(&replacement.replacement_template)
        } else {
            replacement.replacement_template.clone()
        };

        let mut matcher = Self {
            inner,
            is_regex: opts.uses_regular_expression,
            capture_group: None,
            template,
        };

        if opts.uses_capture_group {
            let available = matcher.group_count();
            let group = opts.captured_group_index;
            if available == 0 || group > available {
                return Err(PatternError::MissingCaptureGroup {
                    index: 0,
                    group,
                    available,
                });
            }
            matcher.capture_group = Some(group);
        }

        Ok(matcher)
    }

    /// Number of explicit capture groups (`$1..$N`); group 0 does not count.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.inner.capture_count().saturating_sub(1)
    }

    /// Whether the search pattern is a regular expression.
    #[inline]
    pub fn is_regex(&self) -> bool {
        self.is_regex
    }

    /// The group reported instead of the whole match, if any.
    #[inline]
    pub fn capture_group(&self) -> Option<usize> {
        self.capture_group
    }

    /// Captures of the first match starting at or after byte `at`.
    ///
    /// Spans are absolute within `haystack`; look-around context before `at`
    /// is still visible to the engine.
    pub fn captures_at(&self, haystack: &[u8], at: usize) -> Option<RegexCaptures> {
        let Ok(mut caps) = self.inner.new_captures() else {
            return None;
        };
        match self.inner.captures_at(haystack, at, &mut caps) {
            Ok(true) => Some(caps),
            _ => None,
        }
    }

    /// Expand the replacement template for `caps`, appending to `out`.
    ///
    /// Literal definitions append the template verbatim. Group references
    /// that do not exist or did not participate expand to nothing.
    pub fn expand(&self, caps: &RegexCaptures, haystack: &[u8], out: &mut Vec<u8>) {
        if !self.is_regex {
            out.extend_from_slice(self.template.as_bytes());
            return;
        }
        // Map $name → index (handles $1 and $foo).
        let mut name_to_index = |name: &str| {
            name.parse::<usize>()
                .ok()
                .or_else(|| self.inner.capture_index(name))
        };
        caps.interpolate(&mut name_to_index, haystack, self.template.as_bytes(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grep_matcher::Captures;

    fn compile(replacement: &Replacement) -> PatternMatcher {
        PatternMatcher::compile(replacement, &ReplaceSettings::default()).unwrap()
    }

    fn expand_first(replacement: &Replacement, haystack: &str) -> String {
        let matcher = compile(replacement);
        let caps = matcher.captures_at(haystack.as_bytes(), 0).unwrap();
        let mut out = Vec::new();
        matcher.expand(&caps, haystack.as_bytes(), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_literal_is_escaped() {
        let matcher = compile(&Replacement::new("a.c", ""));
        assert!(matcher.captures_at(b"abc", 0).is_none());
        let caps = matcher.captures_at(b"xa.c", 0).unwrap();
        assert_eq!(caps.get(0).map(|m| (m.start(), m.end())), Some((1, 4)));
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let matcher = compile(&Replacement::new("apple", ""));
        assert!(matcher.captures_at(b"Apple", 0).is_none());

        let matcher = compile(&Replacement::new("apple", "").ignoring_case());
        assert!(matcher.captures_at(b"Apple", 0).is_some());
    }

    #[test]
    fn test_whole_word() {
        let matcher = compile(&Replacement::new("apple", "").whole_word());
        let caps = matcher.captures_at(b"apples apple", 0).unwrap();
        assert_eq!(caps.get(0).map(|m| (m.start(), m.end())), Some((7, 12)));
    }

    #[test]
    fn test_expand_captures() {
        let replacement = Replacement::regex(r"(\w+)@(\w+)", "$2 at ${1}");
        assert_eq!(expand_first(&replacement, "me@home"), "home at me");

        // out-of-range group expands to nothing
        let replacement = Replacement::regex(r"(\w+)", "[$1$7]");
        assert_eq!(expand_first(&replacement, "word"), "[word]");
    }

    #[test]
    fn test_expand_unescapes_regex_templates() {
        let replacement = Replacement::regex(r"b(c)", r"$1\t");
        assert_eq!(expand_first(&replacement, "abcd"), "c\t");

        // literal templates are used verbatim
        let replacement = Replacement::new("b", r"$1\t");
        assert_eq!(expand_first(&replacement, "abcd"), r"$1\t");
    }

    #[test]
    fn test_group_count() {
        assert_eq!(compile(&Replacement::regex("(a)(b)?", "")).group_count(), 2);
        assert_eq!(compile(&Replacement::new("(a)", "")).group_count(), 0);
    }
}
