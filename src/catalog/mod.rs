//! Task catalog construction.
//!
//! The catalog combines the configured plugins with the fixed file-scan
//! filter terms and turns both into [`TaskDefinition`]s. Iteration order
//! is plugins in configuration order, then filters in list order.

pub mod error;
pub mod parser;

pub use error::CatalogError;
pub use parser::{parse_task_list, CatalogEntry};

use crate::models::{
    filter_task_name, filter_term_of, TaskDefinition, TaskFamily, FILTER_TASK_PREFIX,
};
use std::path::Path;
use tracing::debug;

/// A file-scan filter term and its report description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTerm {
    pub term: &'static str,
    pub help_text: &'static str,
}

/// Filter terms applied to `filescan` output.
pub const FILTER_TERMS: &[FilterTerm] = &[
    FilterTerm {
        term: "Desktop",
        help_text: "Files on the desktop",
    },
    FilterTerm {
        term: "Downloads",
        help_text: "Downloaded files",
    },
    FilterTerm {
        term: ".zip",
        help_text: "Zip archives",
    },
    FilterTerm {
        term: "flag",
        help_text: "Files named like flags",
    },
    FilterTerm {
        term: "evtx",
        help_text: "Windows event logs",
    },
];

/// Everything needed to build the tool arguments of a task.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Profile passed as `--profile=<profile>`.
    pub profile: String,
    /// Memory image passed as `-f <image>`.
    pub image: String,
}

impl InvocationContext {
    fn base_args(&self) -> Vec<String> {
        vec![
            format!("--profile={}", self.profile),
            "-f".to_string(),
            self.image.clone(),
        ]
    }
}

/// Read and parse a task list file.
///
/// Any read or parse error is returned; no partial list is produced.
pub fn read_task_list(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_task_list(&content)
}

/// The full, immutable set of tasks for one run.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    entries: Vec<CatalogEntry>,
    filters: Vec<FilterTerm>,
    tasks: Vec<TaskDefinition>,
}

impl TaskCatalog {
    /// Build the catalog from parsed entries and filter terms.
    pub fn build(
        entries: Vec<CatalogEntry>,
        filters: &[FilterTerm],
        ctx: &InvocationContext,
    ) -> Self {
        let mut tasks = Vec::with_capacity(entries.len() + filters.len());

        for entry in &entries {
            let mut arguments = ctx.base_args();
            arguments.push(entry.name.clone());
            tasks.push(TaskDefinition {
                name: entry.name.clone(),
                arguments,
                help_text: entry.help_text.clone(),
                family: TaskFamily::Catalog,
                filter: None,
            });
        }

        for filter in filters {
            let mut arguments = ctx.base_args();
            arguments.push(FILTER_TASK_PREFIX.to_string());
            tasks.push(TaskDefinition {
                name: filter_task_name(filter.term),
                arguments,
                help_text: filter.help_text.to_string(),
                family: TaskFamily::Filter,
                filter: Some(filter.term.to_string()),
            });
        }

        debug!("Built catalog with {} tasks", tasks.len());

        Self {
            entries,
            filters: filters.to_vec(),
            tasks,
        }
    }

    /// All tasks in report order.
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Resolve the help text of a task by family.
    ///
    /// Filter tasks have their term extracted from the name and looked up
    /// in the filter list; other names are looked up among the plugins.
    pub fn help_text(&self, task_name: &str) -> Result<&str, CatalogError> {
        let found = match filter_term_of(task_name) {
            Some(term) => self
                .filters
                .iter()
                .find(|f| f.term == term)
                .map(|f| f.help_text),
            None => self
                .entries
                .iter()
                .find(|e| e.name == task_name)
                .map(|e| e.help_text.as_str()),
        };

        found.ok_or_else(|| CatalogError::UnknownTask(task_name.to_string()))
    }
}
