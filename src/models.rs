//! Data models for the plugin sweep.
//!
//! This module contains the core data structures shared by the catalog,
//! the dispatcher and the report: task definitions, per-task outcomes and
//! the run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Prefix used for filter task names, e.g. `filescan(Desktop)`.
pub const FILTER_TASK_PREFIX: &str = "filescan";

/// Which part of the catalog a task was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFamily {
    /// One task per configured plugin.
    Catalog,
    /// One task per fixed file-scan filter term.
    Filter,
}

/// A single invocation of the analysis tool.
///
/// Definitions are built once per run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    /// Unique task name; also the stem of the persisted output file.
    pub name: String,
    /// Arguments passed to the tool (after any configured prefix args).
    pub arguments: Vec<String>,
    /// Human-readable description used as the report subheading.
    pub help_text: String,
    /// Family the task belongs to.
    pub family: TaskFamily,
    /// Term that captured lines must contain (filter tasks only).
    pub filter: Option<String>,
}

impl TaskDefinition {
    /// File name of the persisted output for this task.
    pub fn output_file_name(&self) -> String {
        output_file_name(&self.name)
    }
}

/// File name of the persisted output for a task name.
pub fn output_file_name(task_name: &str) -> String {
    format!("{}.txt", task_name)
}

/// Compose the name of a filter task from its term.
pub fn filter_task_name(term: &str) -> String {
    format!("{}({})", FILTER_TASK_PREFIX, term)
}

/// Extract the term embedded in a filter task name.
///
/// Returns `None` for names that are not of the form `filescan(<term>)`.
pub fn filter_term_of(task_name: &str) -> Option<&str> {
    task_name
        .strip_prefix(FILTER_TASK_PREFIX)?
        .strip_prefix('(')?
        .strip_suffix(')')
        .filter(|term| !term.is_empty())
}

/// Terminal classification of a task's single execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Output was captured and persisted.
    Success { bytes: usize },
    /// The tool produced no output (after filtering); nothing persisted.
    EmptyOutput,
    /// The wall-clock timeout elapsed; nothing persisted.
    Timeout,
    /// The tool could not be run or its output could not be persisted.
    ExecutionError { message: String },
}

impl TaskOutcome {
    /// Whether this outcome left a persisted output file behind.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }

    /// Label shown by the progress display.
    ///
    /// Failures carry a parenthetical marker so they are distinguishable
    /// from a plain completion.
    pub fn progress_label(&self, task_name: &str) -> String {
        match self {
            TaskOutcome::Success { .. } => task_name.to_string(),
            TaskOutcome::EmptyOutput => format!("{} (no output)", task_name),
            TaskOutcome::Timeout => format!("{} (timed out)", task_name),
            TaskOutcome::ExecutionError { .. } => format!("{} (error)", task_name),
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Success { bytes } => write!(f, "success ({} bytes)", bytes),
            TaskOutcome::EmptyOutput => write!(f, "empty output"),
            TaskOutcome::Timeout => write!(f, "timeout"),
            TaskOutcome::ExecutionError { message } => write!(f, "error: {}", message),
        }
    }
}

/// Record of one dispatched task.
#[derive(Debug, Clone)]
pub struct TaskRun {
    /// Task name.
    pub name: String,
    /// How the execution ended.
    pub outcome: TaskOutcome,
    /// Wall-clock time spent on the task.
    pub elapsed: Duration,
}

/// Summary of a whole sweep, printed at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Memory image that was analyzed.
    pub image: PathBuf,
    /// Profile passed to every task.
    pub profile: String,
    /// Directory holding the per-task outputs and the report.
    pub output_dir: PathBuf,
    /// Path of the assembled report.
    pub report_path: PathBuf,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Total wall-clock duration in seconds.
    pub duration_seconds: f64,
    /// Number of tasks in the catalog.
    pub total_tasks: usize,
    /// Tasks skipped because a previous run already persisted their output.
    pub skipped: usize,
    /// Tasks that persisted output in this run.
    pub succeeded: usize,
    /// Tasks that produced no output.
    pub empty: usize,
    /// Tasks that timed out.
    pub timed_out: usize,
    /// Tasks that failed to run.
    pub failed: usize,
    /// Names of the tasks that did not succeed, sorted.
    pub unfinished: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_task_name_round_trip() {
        let name = filter_task_name("Desktop");
        assert_eq!(name, "filescan(Desktop)");
        assert_eq!(filter_term_of(&name), Some("Desktop"));
        assert_eq!(filter_term_of("filescan(.zip)"), Some(".zip"));
    }

    #[test]
    fn test_filter_term_of_rejects_plain_names() {
        assert_eq!(filter_term_of("pslist"), None);
        assert_eq!(filter_term_of("filescan"), None);
        assert_eq!(filter_term_of("filescan()"), None);
        assert_eq!(filter_term_of("filescan(Desktop"), None);
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("pslist"), "pslist.txt");
        assert_eq!(output_file_name("filescan(evtx)"), "filescan(evtx).txt");
    }

    #[test]
    fn test_progress_labels() {
        assert_eq!(
            TaskOutcome::Success { bytes: 3 }.progress_label("pslist"),
            "pslist"
        );
        assert_eq!(
            TaskOutcome::EmptyOutput.progress_label("pslist"),
            "pslist (no output)"
        );
        assert_eq!(
            TaskOutcome::Timeout.progress_label("netscan"),
            "netscan (timed out)"
        );
        let err = TaskOutcome::ExecutionError {
            message: "not found".to_string(),
        };
        assert_eq!(err.progress_label("hashdump"), "hashdump (error)");
        assert!(!err.is_success());
    }
}
