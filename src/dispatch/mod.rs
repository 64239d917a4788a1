//! Task dispatch.
//!
//! This module provides the worker pool that runs remaining tasks
//! against the analysis tool.

pub mod dispatcher;

pub use dispatcher::{default_concurrency, DispatchConfig, Dispatcher};
