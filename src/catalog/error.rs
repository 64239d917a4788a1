//! Catalog error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the task configuration or resolving tasks.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The task configuration could not be read.
    #[error("failed to read task list '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record has no `-` between name and help text.
    #[error("line {line}: missing '-' separator between plugin name and help text")]
    MissingSeparator { line: usize },

    /// A record has nothing before the separator.
    #[error("line {line}: empty plugin name")]
    EmptyName { line: usize },

    /// A plugin name contains characters that cannot form a task file name.
    #[error("line {line}: invalid plugin name '{name}' (allowed: letters, digits, '_', '.')")]
    InvalidName { line: usize, name: String },

    /// A record has nothing after the separator.
    #[error("line {line}: empty help text for '{name}'")]
    EmptyHelp { line: usize, name: String },

    /// The same task name appears twice.
    #[error("line {line}: duplicate task '{name}'")]
    DuplicateTask { line: usize, name: String },

    /// A task name does not belong to the catalog.
    #[error("unknown task '{0}'")]
    UnknownTask(String),
}
