//! Report generation modules.

pub mod generator;

pub use generator::write_report;
