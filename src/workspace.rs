//! Output directory handling.
//!
//! The output directory sits next to the memory image and holds one text
//! file per finished task plus the report. Files are written to a temporary
//! name in the same directory and renamed into place, so a crash never
//! leaves a truncated file under a final name.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Name of the output directory created beside the image.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Default output directory for an image: `<image parent>/output`.
pub fn default_output_dir(image: &Path) -> PathBuf {
    match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(OUTPUT_DIR_NAME),
        _ => PathBuf::from(OUTPUT_DIR_NAME),
    }
}

/// Create the output directory if needed.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    debug!("Output directory ready: {}", dir.display());
    Ok(())
}

/// Atomically write `content` to `dir/file_name`. Returns the final path.
pub fn write_atomic(dir: &Path, file_name: &str, content: &[u8]) -> std::io::Result<PathBuf> {
    let target = dir.join(file_name);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}
