//! One full sweep: skip finished tasks, dispatch the rest, rebuild the report.

use crate::catalog::TaskCatalog;
use crate::completion::remaining_tasks;
use crate::dispatch::Dispatcher;
use crate::models::TaskRun;
use crate::progress::ProgressTracker;
use crate::report::write_report;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a sweep did.
#[derive(Debug)]
pub struct SweepResult {
    /// Runs dispatched in this sweep, in completion order.
    pub runs: Vec<TaskRun>,
    /// Tasks skipped because their output already existed.
    pub skipped: usize,
    /// Progress notifications received.
    pub notifications: u64,
    /// Path of the rebuilt report.
    pub report_path: PathBuf,
}

/// Run every unfinished task of `catalog`, then rebuild the report.
///
/// Task failures are reported through the returned runs; only a failure to
/// write the report itself is an error.
pub async fn run_sweep(
    catalog: &TaskCatalog,
    dispatcher: &Dispatcher,
    output_dir: &Path,
    report_name: &str,
    show_progress: bool,
) -> Result<SweepResult> {
    let remaining = remaining_tasks(output_dir, catalog.tasks());
    let skipped = catalog.len() - remaining.len();
    info!(
        "{} tasks in catalog, {} already complete, {} to run",
        catalog.len(),
        skipped,
        remaining.len()
    );

    let progress = ProgressTracker::new(remaining.len() as u64, show_progress);
    let runs = if remaining.is_empty() {
        Vec::new()
    } else {
        dispatcher.run(remaining, &progress).await
    };
    progress.finish();

    let report_path = write_report(catalog, output_dir, report_name)?;

    Ok(SweepResult {
        runs,
        skipped,
        notifications: progress.completed(),
        report_path,
    })
}
