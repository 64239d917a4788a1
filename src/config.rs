//! Configuration file handling.
//!
//! This module handles loading `.volsweep.toml` and merging it with the
//! command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".volsweep.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis tool settings.
    #[serde(default)]
    pub tool: ToolConfig,

    /// Task list settings.
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of tool processes run at once. Unset means host parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Output directory. Unset means `<image parent>/output`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    /// File name of the report inside the output directory.
    #[serde(default = "default_report_name")]
    pub report_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            output_dir: None,
            report_name: default_report_name(),
        }
    }
}

fn default_report_name() -> String {
    "summary.md".to_string()
}

/// Analysis tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path or name of the tool binary.
    #[serde(default = "default_tool_path")]
    pub path: String,

    /// Arguments placed before every invocation, e.g. `["vol.py"]` when
    /// `path` is an interpreter.
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-task timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            path: default_tool_path(),
            args: Vec::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_tool_path() -> String {
    if cfg!(target_os = "windows") {
        "vol.exe".to_string()
    } else {
        "vol.py".to_string()
    }
}

fn default_timeout() -> u64 {
    120
}

/// Task list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Path of the `name-help` task list.
    #[serde(default = "default_tasks_file")]
    pub file: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            file: default_tasks_file(),
        }
    }
}

fn default_tasks_file() -> String {
    "tasklist.cfg".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref path) = args.volatility_path {
            self.tool.path = path.clone();
        }
        if let Some(timeout) = args.timeout {
            self.tool.timeout_seconds = timeout;
        }
        if let Some(concurrency) = args.concurrency {
            self.general.concurrency = Some(concurrency);
        }
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = Some(dir.display().to_string());
        }
        if let Some(ref tasks) = args.tasks {
            self.tasks.file = tasks.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tool.timeout_seconds, 120);
        assert_eq!(config.general.report_name, "summary.md");
        assert_eq!(config.tasks.file, "tasklist.cfg");
        assert!(config.general.concurrency.is_none());
        assert!(config.tool.args.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
concurrency = 2
report_name = "report.md"

[tool]
path = "python2"
args = ["/opt/volatility/vol.py"]
timeout_seconds = 600
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.concurrency, Some(2));
        assert_eq!(config.general.report_name, "report.md");
        assert_eq!(config.tool.path, "python2");
        assert_eq!(config.tool.args, vec!["/opt/volatility/vol.py"]);
        assert_eq!(config.tool.timeout_seconds, 600);
        assert_eq!(config.tasks.file, "tasklist.cfg");
    }

    #[test]
    fn test_merge_only_overrides_given_args() {
        let mut config: Config =
            toml::from_str("[tool]\npath = \"vol2\"\ntimeout_seconds = 300\n").unwrap();
        let mut args = make_args();
        args.timeout = Some(30);
        args.tasks = Some(PathBuf::from("cases/tasks.cfg"));

        config.merge_with_args(&args);

        assert_eq!(config.tool.path, "vol2");
        assert_eq!(config.tool.timeout_seconds, 30);
        assert_eq!(config.tasks.file, "cases/tasks.cfg");
        assert!(config.general.concurrency.is_none());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[tool]"));
        assert!(toml_str.contains("[tasks]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.tool.timeout_seconds, 120);
    }
}
