//! progress.rs: cooperative cancellation and progress counters for find/replace
//!
//! Invariants:
//! - Cheap to clone; all clones observe the same underlying state.
//! - `completed_units` and `match_count` only ever increase.
//! - Cancelling and finishing are idempotent; once set they stay set.
//!
//! Concurrency & Memory:
//! - Lock-free and thread-safe via atomics with `SeqCst` for clarity.
//! - The engine is the only writer of the counters, the caller the only
//!   writer of the cancellation and finish flags.
//!
//! Usage:
//! - Create with the definition-index scope before running the engine on a worker.
//! - Call `cancel()` from a controller; the engine polls between definitions.
//! - Read `snapshot()` (or install an observer) to drive a progress indicator.

use std::fmt;
use std::ops::Range;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// Callback invoked on the engine thread after every completed unit.
pub type ProgressObserver = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Point-in-time copy of a [`FindProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed_units: usize,
    pub total_units: usize,
    pub match_count: usize,
    pub is_cancelled: bool,
    pub is_finished: bool,
}

struct Inner {
    scope: Range<usize>,
    completed_units: AtomicUsize,
    match_count: AtomicUsize,
    cancelled: AtomicBool,
    finished: AtomicBool,
    observer: Option<ProgressObserver>,
}

/// Progress of one find/replace batch shared between the engine and its caller.
#[derive(Clone)]
pub struct FindProgress(Arc<Inner>);

impl fmt::Debug for FindProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindProgress")
            .field("scope", &self.0.scope)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl FindProgress {
    /// Construct a fresh progress over the definition indices in `scope`.
    pub fn new(scope: Range<usize>) -> Self {
        Self::build(scope, None)
    }

    /// Like [`FindProgress::new`], calling `observer` after every completed unit.
    pub fn with_observer<F>(scope: Range<usize>, observer: F) -> Self
    where
        F: Fn(&ProgressSnapshot) + Send + Sync + 'static,
    {
        Self::build(scope, Some(Arc::new(observer)))
    }

    fn build(scope: Range<usize>, observer: Option<ProgressObserver>) -> Self {
        FindProgress(Arc::new(Inner {
            scope,
            completed_units: AtomicUsize::new(0),
            match_count: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            observer,
        }))
    }

    #[inline]
    pub fn scope(&self) -> Range<usize> {
        self.0.scope.clone()
    }

    #[inline]
    pub fn total_units(&self) -> usize {
        self.0.scope.len()
    }

    #[inline]
    pub fn completed_units(&self) -> usize {
        self.0.completed_units.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn match_count(&self) -> usize {
        self.0.match_count.load(Ordering::SeqCst)
    }

    /// Fraction of units done, in `0.0..=1.0`. An empty scope counts as done.
    pub fn fraction_completed(&self) -> f64 {
        let total = self.total_units();
        if total == 0 {
            return 1.0;
        }
        (self.completed_units().min(total) as f64) / (total as f64)
    }

    /// Request cancellation.
    ///
    /// This operation is idempotent and visible to all clones.
    #[inline]
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    /// Mark the batch as consumed by the caller.
    #[inline]
    pub fn finish(&self) {
        self.0.finished.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.0.finished.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed_units: self.completed_units(),
            total_units: self.total_units(),
            match_count: self.match_count(),
            is_cancelled: self.is_cancelled(),
            is_finished: self.is_finished(),
        }
    }

    #[inline]
    pub(crate) fn increment_count(&self, by: usize) {
        self.0.match_count.fetch_add(by, Ordering::SeqCst);
    }

    pub(crate) fn increment_completed_unit(&self) {
        self.0.completed_units.fetch_add(1, Ordering::SeqCst);
        if let Some(observer) = &self.0.observer {
            observer(&self.snapshot());
        }
    }

    /// User-facing message for the final count of this batch.
    pub fn summary(&self, action: FindAction) -> FindSummary {
        FindSummary::new(action, self.match_count())
    }
}

/// Which kind of batch produced a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindAction {
    Find,
    Replace,
}

/// Result message shown once a batch is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindSummary {
    pub action: FindAction,
    pub count: usize,
}

impl FindSummary {
    pub fn new(action: FindAction, count: usize) -> Self {
        Self { action, count }
    }

    /// Nothing matched; callers typically beep instead of editing.
    pub fn is_not_found(&self) -> bool {
        self.count == 0
    }
}

impl fmt::Display for FindSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            FindAction::Find => "found",
            FindAction::Replace => "replaced",
        };
        match self.count {
            0 => write!(f, "Not found."),
            1 => write!(f, "1 string {verb}."),
            n => write!(f, "{n} strings {verb}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_clones_share_state() {
        let progress = FindProgress::new(0..4);
        let other = progress.clone();

        other.cancel();
        progress.increment_completed_unit();
        progress.increment_count(3);

        assert!(progress.is_cancelled());
        assert_eq!(other.completed_units(), 1);
        assert_eq!(other.match_count(), 3);
        assert_eq!(other.fraction_completed(), 0.25);
    }

    #[test]
    fn test_empty_scope_is_complete() {
        assert_eq!(FindProgress::new(0..0).fraction_completed(), 1.0);
    }

    #[test]
    fn test_observer_sees_every_unit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = FindProgress::with_observer(0..2, move |s| {
            sink.lock().unwrap().push(s.completed_units);
        });

        progress.increment_completed_unit();
        progress.increment_completed_unit();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_summary_message() {
        assert_eq!(FindSummary::new(FindAction::Find, 0).to_string(), "Not found.");
        assert_eq!(FindSummary::new(FindAction::Find, 1).to_string(), "1 string found.");
        assert_eq!(FindSummary::new(FindAction::Replace, 3).to_string(), "3 strings replaced.");

        let progress = FindProgress::new(0..1);
        progress.increment_count(2);
        progress.finish();
        assert!(progress.is_finished());
        assert_eq!(progress.summary(FindAction::Find).count, 2);
    }
}
