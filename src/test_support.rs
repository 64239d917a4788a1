//! Helpers for tests that need a stand-in for the analysis tool.
//!
//! The fake tool is `/bin/sh` running a generated script, so the script
//! never needs the executable bit. The script sees the task arguments as
//! `$1..`, i.e. `--profile=<P> -f <image> <plugin>`, so `$4` is the plugin.

use crate::catalog::{parse_task_list, FilterTerm, InvocationContext, TaskCatalog};
use crate::tool::VolatilityTool;
use std::path::{Path, PathBuf};

/// Write `body` as a shell script under `dir` and wrap it as a tool.
pub fn fake_tool(dir: &Path, body: &str) -> VolatilityTool {
    let script = dir.join("fake_vol.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
    VolatilityTool::new("/bin/sh", vec![script.display().to_string()])
}

/// Script line that appends the plugin name to `log` on every invocation.
pub fn log_invocations(log: &Path) -> String {
    format!("echo \"$4\" >> '{}'", log.display())
}

/// Plugin names recorded by [`log_invocations`].
pub fn invocations(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .map(|s| s.lines().map(String::from).collect())
        .unwrap_or_default()
}

/// The three-task catalog: `pslist`, `netscan`, `filescan(Desktop)`.
pub fn scenario_catalog(image: &Path) -> TaskCatalog {
    let entries = parse_task_list("pslist-Process list\nnetscan-Network scan").unwrap();
    let filters = [FilterTerm {
        term: "Desktop",
        help_text: "Files on the desktop",
    }];
    let ctx = InvocationContext {
        profile: "Win10x64_19041".to_string(),
        image: image.display().to_string(),
    };
    TaskCatalog::build(entries, &filters, &ctx)
}

/// Output directory beside `image`, created.
pub fn output_dir_for(image: &Path) -> PathBuf {
    let dir = crate::workspace::default_output_dir(image);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
