//! Crash-backtrace correlation
//!
//! Determines, per issue, whether an observed crash corroborates it: a
//! backtrace frame in the same file within a small line distance. Traversal
//! is in stack order and stops at the first sufficiently-close frame.
//! Backtraces are ordered by recency of execution, so the topmost plausible
//! frame is taken over a deeper frame with a smaller numeric distance.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;

use crate::model::{Backtrace, Issue, MatchedBacktrace};

/// Default line distance allowed between a crash frame and an issue
pub const DEFAULT_DISTANCE_THRESHOLD: usize = 1;

/// A successful frame match: 1-based frame number and line distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMatch {
    pub frame: usize,
    pub distance: usize,
}

/// Backtraces grouped by the source-file basenames their frames mention.
///
/// A backtrace is indexed under every distinct basename appearing among its
/// frames, so it can corroborate issues in any of those files; within one
/// bucket it appears at most once.
#[derive(Debug, Default)]
pub struct CrashIndex {
    by_file: HashMap<String, Vec<Arc<Backtrace>>>,
}

impl CrashIndex {
    /// Scan every frame of every backtrace once and build the buckets.
    pub fn build(backtraces: &[Arc<Backtrace>]) -> Self {
        let mut by_file: HashMap<String, Vec<Arc<Backtrace>>> = HashMap::new();

        for backtrace in backtraces {
            let mut names = BTreeSet::new();
            for frame in &backtrace.frames {
                if let Some(name) = frame.source_file.as_deref() {
                    names.insert(name);
                }
            }
            for name in names {
                by_file
                    .entry(name.to_string())
                    .or_default()
                    .push(Arc::clone(backtrace));
            }
        }

        Self { by_file }
    }

    /// Candidate backtraces for a basename; unknown names yield an empty
    /// slice, the normal "no evidence" outcome.
    pub fn candidates(&self, basename: &str) -> &[Arc<Backtrace>] {
        self.by_file
            .get(basename)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct basenames with at least one backtrace.
    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    /// First match for the issue across its candidate backtraces, in
    /// candidate order. Issues without a line number never match.
    pub fn find_match(&self, issue: &Issue, threshold: usize) -> Option<FrameMatch> {
        let line = issue.line?;
        let basename = issue.source.basename()?;

        self.candidates(basename)
            .iter()
            .find_map(|bt| match_frames(bt, basename, line, threshold))
    }

    /// Whether any candidate backtrace corroborates the issue.
    pub fn matches(&self, issue: &Issue, threshold: usize) -> bool {
        self.find_match(issue, threshold).is_some()
    }
}

/// Walk `backtrace` in stack order (frame 1 first) and return the first
/// frame in `basename` within `threshold` lines of `line`.
fn match_frames(
    backtrace: &Backtrace,
    basename: &str,
    line: usize,
    threshold: usize,
) -> Option<FrameMatch> {
    for (idx, frame) in backtrace.frames.iter().enumerate() {
        if frame.source_file.as_deref() != Some(basename) {
            continue;
        }
        let distance = frame.line_number.abs_diff(line);
        if distance <= threshold {
            return Some(FrameMatch {
                frame: idx + 1,
                distance,
            });
        }
    }
    None
}

/// Attach matching backtraces to every issue.
///
/// Every candidate backtrace that yields a frame match is appended as a
/// [`MatchedBacktrace`] sharing the backtrace `Arc`, in candidate order.
/// Repeated matches of the same backtrace hash are kept as-is. Issues are
/// processed in parallel; each issue's list is written only by the task
/// holding its `&mut Issue`, so the result is identical to a sequential run.
pub fn correlate(index: &CrashIndex, issues: &mut [Issue], threshold: usize) {
    issues.par_iter_mut().for_each(|issue| {
        let Some(line) = issue.line else {
            return;
        };
        let source = Arc::clone(&issue.source);
        let Some(basename) = source.basename() else {
            return;
        };

        for bt in index.candidates(basename) {
            if let Some(m) = match_frames(bt, basename, line, threshold) {
                issue.backtraces.push(MatchedBacktrace {
                    backtrace: Arc::clone(bt),
                    frame: m.frame,
                    distance: m.distance,
                });
            }
        }
    });
}
