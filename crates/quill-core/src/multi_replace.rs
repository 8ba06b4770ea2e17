//! Ordered multi-pattern find/replace.
//!
//! A [`MultipleReplace`] holds replacement definitions that are applied one
//! after another. In replace mode every definition sees the text produced by
//! the previous ones; in find mode all definitions search the same snapshot.
//! Progress and cancellation go through a shared [`FindProgress`], polled
//! between definitions.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::definition::{InvalidPatternPolicy, ReplaceSettings, Replacement};
use crate::error::{Error, Result};
use crate::tools::matcher::PatternMatcher;
use crate::tools::model::{CharRange, MatchResult};
use crate::tools::offsets::CharIndex;
use crate::tools::progress::FindProgress;
use crate::tools::replace::{apply_plan, map_range, plan_in_text};
use crate::tools::search::search_regions;

/// An ordered set of replacement definitions and the settings they share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultipleReplace {
    pub replacements: Vec<Replacement>,
    pub settings: ReplaceSettings,
}

/// Output of [`MultipleReplace::replace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceResult {
    pub text: String,
    /// The input ranges carried through every applied edit
    pub selected_ranges: Vec<CharRange>,
}

impl MultipleReplace {
    pub fn new(replacements: Vec<Replacement>) -> Self {
        Self {
            replacements,
            settings: ReplaceSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ReplaceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fresh progress covering every definition of this set.
    pub fn progress(&self) -> FindProgress {
        FindProgress::new(0..self.replacements.len())
    }

    /// Find every match of every enabled definition in `text`.
    ///
    /// With `in_selection`, only `ranges` are searched. Results are sorted by
    /// location, then by definition index.
    pub fn find(
        &self,
        text: &str,
        ranges: &[CharRange],
        in_selection: bool,
        progress: &FindProgress,
    ) -> Result<Vec<MatchResult>> {
        let matchers = self.compile_all(self.settings.find_policy)?;
        check_cancelled(progress)?;

        let index = CharIndex::build(text);
        let regions = scope_regions(&index, ranges, in_selection);
        let mut results: Vec<MatchResult> = Vec::new();

        for (pattern_index, matcher) in matchers.iter().enumerate() {
            if let Some(matcher) = matcher.as_ref().filter(|_| !text.is_empty()) {
                let before = results.len();
                search_regions(text, matcher, &regions, |hit| {
                    results.push(MatchResult {
                        range: index.char_range_of(hit.span.start, hit.span.end),
                        pattern_index,
                    });
                    progress.increment_count(1);
                    true
                });
                log::debug!(
                    "find: definition {pattern_index} matched {} times",
                    results.len() - before
                );
            }
            progress.increment_completed_unit();
            check_cancelled(progress)?;
        }

        results.sort_by_key(|m| (m.range.location, m.pattern_index));
        Ok(results)
    }

    /// Apply every enabled definition in order.
    ///
    /// With `in_selection`, each definition only replaces inside `ranges` as
    /// moved by the previous definitions. On cancellation no text is returned.
    pub fn replace(
        &self,
        text: &str,
        ranges: &[CharRange],
        in_selection: bool,
        progress: &FindProgress,
    ) -> Result<ReplaceResult> {
        let matchers = self.compile_all(self.settings.replace_policy)?;
        check_cancelled(progress)?;

        let mut text = text.to_owned();
        let mut selected_ranges = ranges.to_vec();

        for (pattern_index, matcher) in matchers.iter().enumerate() {
            if let Some(matcher) = matcher.as_ref().filter(|_| !text.is_empty()) {
                let index = CharIndex::build(&text);
                let regions = scope_regions(&index, &selected_ranges, in_selection);
                let plan = plan_in_text(&text, matcher, &regions);

                if !plan.is_empty() {
                    let edits = plan.char_edits(&index);
                    selected_ranges = selected_ranges
                        .iter()
                        .map(|&range| map_range(range, &edits))
                        .collect();
                    text = apply_plan(&text, &plan);
                    progress.increment_count(plan.len());
                }
                log::debug!(
                    "replace: definition {pattern_index} replaced {} times",
                    plan.len()
                );
            }
            progress.increment_completed_unit();
            check_cancelled(progress)?;
        }

        Ok(ReplaceResult {
            text,
            selected_ranges,
        })
    }

    /// Compile every enabled definition before any matching starts.
    ///
    /// Disabled definitions, and invalid ones under [`InvalidPatternPolicy::Skip`],
    /// compile to `None`.
    fn compile_all(&self, policy: InvalidPatternPolicy) -> Result<Vec<Option<PatternMatcher>>> {
        let mut matchers = Vec::with_capacity(self.replacements.len());

        for (index, replacement) in self.replacements.iter().enumerate() {
            if !replacement.is_enabled {
                matchers.push(None);
                continue;
            }
            match PatternMatcher::compile(replacement, &self.settings) {
                Ok(matcher) => matchers.push(Some(matcher)),
                Err(e) => {
                    let e = e.with_index(index);
                    match policy {
                        InvalidPatternPolicy::Abort => return Err(e.into()),
                        InvalidPatternPolicy::Skip => {
                            log::warn!("skipping invalid definition: {e}");
                            matchers.push(None);
                        }
                    }
                }
            }
        }
        Ok(matchers)
    }
}

#[inline]
fn check_cancelled(progress: &FindProgress) -> Result<()> {
    if progress.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}

/// Byte regions to search: the merged selection, or the whole text.
fn scope_regions(index: &CharIndex, ranges: &[CharRange], in_selection: bool) -> Vec<Range<usize>> {
    if !in_selection {
        return vec![0..index.total_bytes()];
    }
    let total = index.total_chars();
    CharRange::merged(ranges.iter().map(|range| range.clamped(total)))
        .into_iter()
        .map(|range| index.byte_range_of(range))
        .collect()
}
