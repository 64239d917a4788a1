//! Profile auto-detection via the `imageinfo` plugin.

use super::{decode_output, VolatilityTool};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

const SUGGESTION_MARKER: &str = "Suggested Profile(s)";

/// Run `imageinfo` against the image and pick the first suggested profile.
pub async fn detect_profile(tool: &VolatilityTool, image: &Path) -> Result<String> {
    info!("No profile given, running imageinfo on {}", image.display());

    let args = vec![
        "-f".to_string(),
        image.display().to_string(),
        "imageinfo".to_string(),
    ];
    let stdout = tool
        .run(&args, None)
        .await
        .context("Failed to run imageinfo for profile detection")?;
    let output = decode_output(&stdout);
    debug!("imageinfo output: {} bytes", output.len());

    match parse_suggested_profile(&output) {
        Some(profile) => {
            info!("Selected profile: {}", profile);
            Ok(profile)
        }
        None => bail!(
            "Could not detect a profile from imageinfo output; pass --profile explicitly"
        ),
    }
}

/// Extract the first profile from the `Suggested Profile(s)` line.
pub fn parse_suggested_profile(output: &str) -> Option<String> {
    let line = output.lines().find(|l| l.contains(SUGGESTION_MARKER))?;
    let (_, suggestions) = line.split_once(':')?;
    let first = suggestions.split(',').next()?.trim();

    if first.is_empty() || first.starts_with("No suggestion") {
        return None;
    }
    Some(first.to_string())
}
