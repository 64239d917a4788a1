//! Outcome aggregation and statistics.
//!
//! This module tallies per-task outcomes from a dispatch into the counters
//! shown at the end of a run.

use crate::models::{TaskOutcome, TaskRun};
use std::time::Duration;

/// Outcome counts for one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub succeeded: usize,
    pub empty: usize,
    pub timed_out: usize,
    pub failed: usize,
}

impl OutcomeTally {
    /// Count the outcomes of the given runs.
    pub fn from_runs(runs: &[TaskRun]) -> Self {
        let mut tally = Self::default();

        for run in runs {
            match run.outcome {
                TaskOutcome::Success { .. } => tally.succeeded += 1,
                TaskOutcome::EmptyOutput => tally.empty += 1,
                TaskOutcome::Timeout => tally.timed_out += 1,
                TaskOutcome::ExecutionError { .. } => tally.failed += 1,
            }
        }

        tally
    }

    /// Number of runs counted.
    pub fn total(&self) -> usize {
        self.succeeded + self.empty + self.timed_out + self.failed
    }
}

/// Names of runs that did not persist output, sorted.
pub fn unfinished_tasks(runs: &[TaskRun]) -> Vec<String> {
    let mut names: Vec<String> = runs
        .iter()
        .filter(|r| !r.outcome.is_success())
        .map(|r| r.name.clone())
        .collect();
    names.sort();
    names
}

/// The slowest runs, longest first.
pub fn slowest_tasks(runs: &[TaskRun], n: usize) -> Vec<(&str, Duration)> {
    let mut timings: Vec<_> = runs.iter().map(|r| (r.name.as_str(), r.elapsed)).collect();
    timings.sort_by_key(|(_, elapsed)| std::cmp::Reverse(*elapsed));
    timings.truncate(n);
    timings
}
