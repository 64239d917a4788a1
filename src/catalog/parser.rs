//! Parser for the `name-helpText` task configuration format.

use super::error::CatalogError;
use std::collections::HashSet;

/// One configured plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Plugin name passed to the tool.
    pub name: String,
    /// Description shown in the report.
    pub help_text: String,
}

/// Parse a task list.
///
/// Each non-blank line that does not start with `#` must be `name-help`.
/// The record is split at the first `-`, so help text may itself contain
/// dashes. Errors carry the 1-based line number.
pub fn parse_task_list(content: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let record = raw.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }

        let (name, help) = record
            .split_once('-')
            .ok_or(CatalogError::MissingSeparator { line })?;
        let name = name.trim();
        let help = help.trim();

        if name.is_empty() {
            return Err(CatalogError::EmptyName { line });
        }
        if !is_valid_name(name) {
            return Err(CatalogError::InvalidName {
                line,
                name: name.to_string(),
            });
        }
        if help.is_empty() {
            return Err(CatalogError::EmptyHelp {
                line,
                name: name.to_string(),
            });
        }
        if !seen.insert(name.to_string()) {
            return Err(CatalogError::DuplicateTask {
                line,
                name: name.to_string(),
            });
        }

        entries.push(CatalogEntry {
            name: name.to_string(),
            help_text: help.to_string(),
        });
    }

    Ok(entries)
}

fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_records() {
        let entries = parse_task_list("pslist-Process list\nnetscan-Network scan\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "pslist");
        assert_eq!(entries[0].help_text, "Process list");
        assert_eq!(entries[1].name, "netscan");
        assert_eq!(entries[1].help_text, "Network scan");
    }

    #[test]
    fn test_help_text_keeps_extra_dashes() {
        let entries = parse_task_list("cmdline-Command line - per process").unwrap();
        assert_eq!(entries[0].help_text, "Command line - per process");
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let content = "# plugins\r\n\r\npslist-Process list\r\n   \n";
        let entries = parse_task_list(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].help_text, "Process list");
    }

    #[test]
    fn test_missing_separator_reports_line() {
        let err = parse_task_list("pslist-Process list\nnetscan\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingSeparator { line: 2 }));
    }

    #[test]
    fn test_rejects_empty_parts() {
        assert!(matches!(
            parse_task_list("-Process list").unwrap_err(),
            CatalogError::EmptyName { line: 1 }
        ));
        assert!(matches!(
            parse_task_list("pslist-  ").unwrap_err(),
            CatalogError::EmptyHelp { line: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_unsafe_names() {
        let err = parse_task_list("../etc-Escape").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidName { line: 1, .. }));

        let err = parse_task_list("filescan(Desktop)-Clash").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidName { .. }));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = parse_task_list("pslist-A\npstree-B\npslist-C").unwrap_err();
        match err {
            CatalogError::DuplicateTask { line, name } => {
                assert_eq!(line, 3);
                assert_eq!(name, "pslist");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
