//! Concurrent task execution.
//!
//! Every remaining task becomes one tool invocation. Invocations run on a
//! pool of at most `concurrency` simultaneous processes, each bounded by the
//! configured timeout. Each task ends in exactly one [`TaskOutcome`] and one
//! progress notification; failures stay inside the dispatcher.

use crate::models::{TaskDefinition, TaskOutcome, TaskRun};
use crate::progress::ProgressTracker;
use crate::tool::{decode_output, ToolError, VolatilityTool};
use crate::workspace::write_atomic;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Pool sizing and per-task limits.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum number of tool processes running at once.
    pub concurrency: usize,
    /// Wall-clock limit for a single task.
    pub timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Host parallelism, used when no pool size is configured.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Runs tasks against the tool and persists their output.
pub struct Dispatcher {
    tool: VolatilityTool,
    output_dir: PathBuf,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(tool: VolatilityTool, output_dir: PathBuf, config: DispatchConfig) -> Self {
        Self {
            tool,
            output_dir,
            config,
        }
    }

    /// Run all `tasks` and wait until every one has settled.
    ///
    /// The returned records are in completion order.
    pub async fn run(
        &self,
        tasks: Vec<&TaskDefinition>,
        progress: &ProgressTracker,
    ) -> Vec<TaskRun> {
        let concurrency = self.config.concurrency.max(1);
        info!(
            "Dispatching {} tasks ({} at a time, {}s timeout)",
            tasks.len(),
            concurrency,
            self.config.timeout.as_secs()
        );

        stream::iter(tasks)
            .map(|task| self.run_task(task, progress))
            .buffer_unordered(concurrency)
            .collect()
            .await
    }

    async fn run_task(&self, task: &TaskDefinition, progress: &ProgressTracker) -> TaskRun {
        let started = Instant::now();
        debug!(task = %task.name, args = ?task.arguments, "starting task");

        let outcome = self.execute(task).await;
        progress.record(&outcome.progress_label(&task.name));

        TaskRun {
            name: task.name.clone(),
            outcome,
            elapsed: started.elapsed(),
        }
    }

    async fn execute(&self, task: &TaskDefinition) -> TaskOutcome {
        match self.tool.run(&task.arguments, Some(self.config.timeout)).await {
            Ok(stdout) => self.classify(task, &stdout),
            Err(ToolError::Timeout(limit)) => {
                error!(task = %task.name, "timed out after {}s", limit.as_secs_f64());
                TaskOutcome::Timeout
            }
            Err(e) => {
                error!(task = %task.name, "execution failed: {}", e);
                TaskOutcome::ExecutionError {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Decode, filter and persist captured output.
    fn classify(&self, task: &TaskDefinition, stdout: &[u8]) -> TaskOutcome {
        let mut text = decode_output(stdout);
        if let Some(ref term) = task.filter {
            text = filter_lines(&text, term);
        }

        if text.is_empty() {
            warn!(task = %task.name, "no output");
            return TaskOutcome::EmptyOutput;
        }

        match write_atomic(&self.output_dir, &task.output_file_name(), text.as_bytes()) {
            Ok(path) => {
                debug!(task = %task.name, "saved {} bytes to {}", text.len(), path.display());
                TaskOutcome::Success { bytes: text.len() }
            }
            Err(e) => {
                error!(task = %task.name, "failed to save output: {}", e);
                TaskOutcome::ExecutionError {
                    message: format!("failed to save output: {}", e),
                }
            }
        }
    }
}

/// Keep only the lines containing `term` (case-sensitive), with their
/// line endings.
pub fn filter_lines(text: &str, term: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| line.contains(term))
        .collect()
}
