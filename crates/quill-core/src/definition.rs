//! Replacement definitions and the settings they are matched with.
//!
//! Everything here is serde (de)serializable in camelCase with every field
//! optional, so a stored definition set only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::tools::matcher::PatternMatcher;

/// How a definition's search pattern is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternOptions {
    /// Regular expression instead of a literal string
    pub uses_regular_expression: bool,
    /// Case-sensitive matching; only an explicit `false` ignores case
    pub is_case_sensitive: bool,
    /// Only match at word boundaries
    pub matches_whole_word: bool,
    /// Report and replace a capture group instead of the whole match
    pub uses_capture_group: bool,
    /// The group used when `uses_capture_group` is set
    pub captured_group_index: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            uses_regular_expression: false,
            is_case_sensitive: true,
            matches_whole_word: false,
            uses_capture_group: false,
            captured_group_index: 1,
        }
    }
}

/// One search pattern and its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Replacement {
    pub search_pattern: String,
    /// Template supporting `$1`, `${1}`, `$name`, `${name}` and `$$` in regex mode.
    pub replacement_template: String,
    pub options: PatternOptions,
    pub description: Option<String>,
    pub is_enabled: bool,
}

impl Default for Replacement {
    fn default() -> Self {
        Self {
            search_pattern: String::new(),
            replacement_template: String::new(),
            options: PatternOptions::default(),
            description: None,
            is_enabled: true,
        }
    }
}

impl Replacement {
    /// Literal, case-sensitive definition.
    pub fn new(search_pattern: impl Into<String>, replacement_template: impl Into<String>) -> Self {
        Self {
            search_pattern: search_pattern.into(),
            replacement_template: replacement_template.into(),
            ..Self::default()
        }
    }

    /// Regular-expression definition.
    pub fn regex(search_pattern: impl Into<String>, replacement_template: impl Into<String>) -> Self {
        let mut replacement = Self::new(search_pattern, replacement_template);
        replacement.options.uses_regular_expression = true;
        replacement
    }

    /// Builder: ignore case.
    #[must_use]
    pub fn ignoring_case(mut self) -> Self {
        self.options.is_case_sensitive = false;
        self
    }

    /// Builder: whole-word matching.
    #[must_use]
    pub fn whole_word(mut self) -> Self {
        self.options.matches_whole_word = true;
        self
    }

    /// Builder: report/replace capture group `group` instead of the whole match.
    #[must_use]
    pub fn capturing(mut self, group: usize) -> Self {
        self.options.uses_capture_group = true;
        self.options.captured_group_index = group;
        self
    }

    /// Check that the definition can be matched with `settings`.
    ///
    /// Errors carry index 0; the engine re-indexes them.
    pub fn validate(&self, settings: &ReplaceSettings) -> Result<(), PatternError> {
        PatternMatcher::compile(self, settings).map(|_| ())
    }
}

/// What to do when a definition fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPatternPolicy {
    /// Log it, record no matches and continue with the next definition
    Skip,
    /// Fail the whole batch before any matching
    Abort,
}

/// Engine-wide options shared by every definition of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplaceSettings {
    /// Anchor-multiline: `^`/`$` match at internal line boundaries
    pub anchors_match_lines: bool,
    /// Dot-all: `.` matches `\n`
    pub dot_matches_new_line: bool,
    /// Unescape `\n`, `\t`, `\\`… in regex replacement templates
    pub unescapes_replacement: bool,
    pub find_policy: InvalidPatternPolicy,
    pub replace_policy: InvalidPatternPolicy,
}

impl Default for ReplaceSettings {
    fn default() -> Self {
        Self {
            anchors_match_lines: true,
            dot_matches_new_line: false,
            unescapes_replacement: true,
            find_policy: InvalidPatternPolicy::Skip,
            replace_policy: InvalidPatternPolicy::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let settings = ReplaceSettings::default();

        assert!(Replacement::new("a", "b").validate(&settings).is_ok());
        assert_eq!(
            Replacement::new("", "b").validate(&settings),
            Err(PatternError::EmptyFindString { index: 0 })
        );
        assert!(matches!(
            Replacement::regex("(a", "").validate(&settings),
            Err(PatternError::InvalidRegex { index: 0, .. })
        ));
        assert_eq!(
            Replacement::regex("a+", "").capturing(1).validate(&settings),
            Err(PatternError::MissingCaptureGroup {
                index: 0,
                group: 1,
                available: 0
            })
        );
        // literal patterns never have groups
        assert!(Replacement::new("(a)", "").capturing(1).validate(&settings).is_err());
        assert!(Replacement::regex("(a)", "").capturing(1).validate(&settings).is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"searchPattern": "foo", "options": {"usesRegularExpression": true}}"#;
        let replacement: Replacement = serde_json::from_str(json).unwrap();

        assert_eq!(replacement.search_pattern, "foo");
        assert_eq!(replacement.replacement_template, "");
        assert!(replacement.options.uses_regular_expression);
        assert!(replacement.options.is_case_sensitive);
        assert_eq!(replacement.options.captured_group_index, 1);
        assert!(replacement.is_enabled);

        let settings: ReplaceSettings = serde_json::from_str(r#"{"findPolicy": "abort"}"#).unwrap();
        assert_eq!(settings.find_policy, InvalidPatternPolicy::Abort);
        assert_eq!(settings.replace_policy, InvalidPatternPolicy::Abort);
        assert!(settings.anchors_match_lines);
    }
}
