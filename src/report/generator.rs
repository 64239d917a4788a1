//! Markdown report generation.
//!
//! This module assembles the summary report from the persisted task
//! outputs. Sections follow catalog order, independent of the order in
//! which tasks finished, and the report is rebuilt from disk every run.

use crate::catalog::TaskCatalog;
use crate::models::TaskDefinition;
use crate::workspace::write_atomic;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Body used for tasks without persisted output.
pub const NO_DATA_PLACEHOLDER: &str = "*No data available*";

/// Content of one report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// Verbatim task output.
    Output(String),
    /// The task has no persisted output.
    NoData,
}

/// One task's section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// Task name.
    pub heading: String,
    /// Task help text.
    pub subheading: String,
    pub body: SectionBody,
}

/// The assembled report.
#[derive(Debug, Clone, Default)]
pub struct ReportDocument {
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    /// Render the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut parts = Vec::with_capacity(self.sections.len() * 2);

        for section in &self.sections {
            parts.push(format!("# {}\n## {}", section.heading, section.subheading));
            match section.body {
                SectionBody::Output(ref content) => {
                    parts.push(format!("```\n{}\n```\n", content))
                }
                SectionBody::NoData => parts.push(format!("{}\n", NO_DATA_PLACEHOLDER)),
            }
        }

        parts.join("\n")
    }

    /// Number of sections that embed task output.
    pub fn sections_with_data(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s.body, SectionBody::Output(_)))
            .count()
    }
}

/// Build the report for every task in the catalog.
///
/// A task whose help text cannot be resolved or whose output cannot be read
/// is logged and left out; the remaining sections are still assembled.
pub fn assemble_report(catalog: &TaskCatalog, output_dir: &Path) -> ReportDocument {
    let mut document = ReportDocument::default();

    for task in catalog.tasks() {
        match build_section(catalog, output_dir, task) {
            Ok(section) => document.sections.push(section),
            Err(e) => error!(task = %task.name, "Skipping report section: {:#}", e),
        }
    }

    document
}

fn build_section(
    catalog: &TaskCatalog,
    output_dir: &Path,
    task: &TaskDefinition,
) -> Result<ReportSection> {
    let help_text = catalog.help_text(&task.name)?;

    let path = output_dir.join(task.output_file_name());
    let body = match std::fs::read_to_string(&path) {
        Ok(content) => SectionBody::Output(content),
        Err(e) if e.kind() == ErrorKind::NotFound => SectionBody::NoData,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    Ok(ReportSection {
        heading: task.name.clone(),
        subheading: help_text.to_string(),
        body,
    })
}

/// Assemble the report and write it to `output_dir/report_name`.
pub fn write_report(
    catalog: &TaskCatalog,
    output_dir: &Path,
    report_name: &str,
) -> Result<PathBuf> {
    info!("Generating report...");
    let document = assemble_report(catalog, output_dir);
    let markdown = document.to_markdown();

    let path = write_atomic(output_dir, report_name, markdown.as_bytes()).with_context(|| {
        format!(
            "Failed to write report to {}",
            output_dir.join(report_name).display()
        )
    })?;

    info!(
        "Report written: {} ({} sections, {} with data)",
        path.display(),
        document.sections.len(),
        document.sections_with_data()
    );
    Ok(path)
}
