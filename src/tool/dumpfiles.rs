//! File extraction through the `dumpfiles` plugin.

use super::{decode_output, VolatilityTool};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Where and what to extract.
#[derive(Debug, Clone)]
pub struct DumpRequest<'a> {
    pub image: &'a Path,
    pub profile: &'a str,
    /// Physical offset of the file object (`-Q`).
    pub location: &'a str,
    /// Directory the tool writes extracted files into (`-D`).
    pub dump_dir: &'a Path,
}

impl DumpRequest<'_> {
    fn arguments(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.image.display().to_string(),
            format!("--profile={}", self.profile),
            "dumpfiles".to_string(),
            "-Q".to_string(),
            self.location.to_string(),
            "-D".to_string(),
            self.dump_dir.display().to_string(),
        ]
    }
}

/// Run `dumpfiles` and return the tool's decoded output.
///
/// No timeout applies; extraction of a single object is user-driven.
pub async fn dump_files(tool: &VolatilityTool, request: &DumpRequest<'_>) -> Result<String> {
    info!(
        "Extracting file at {} into {}",
        request.location,
        request.dump_dir.display()
    );

    let stdout = tool
        .run(&request.arguments(), None)
        .await
        .context("Failed to run dumpfiles")?;

    Ok(decode_output(&stdout))
}
