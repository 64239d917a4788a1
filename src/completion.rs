//! Resume-by-presence: decide which tasks still need to run.
//!
//! A task counts as complete when `<output dir>/<name>.txt` exists. There
//! is no other manifest; deleting a file makes its task run again.

use crate::models::TaskDefinition;
use std::path::Path;
use tracing::debug;

/// Tasks whose output file does not exist yet, in catalog order.
pub fn remaining_tasks<'a>(
    output_dir: &Path,
    tasks: &'a [TaskDefinition],
) -> Vec<&'a TaskDefinition> {
    tasks
        .iter()
        .filter(|task| {
            let done = output_dir.join(task.output_file_name()).exists();
            if done {
                debug!(task = %task.name, "output present, skipping");
            }
            !done
        })
        .collect()
}
