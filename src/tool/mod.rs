//! Invocation of the external analysis tool.
//!
//! Every plugin run, the profile probe and the dumpfiles mode go through
//! [`VolatilityTool`], which spawns the configured program with optional
//! prefix arguments and captures its standard output.

pub mod dumpfiles;
pub mod profile;

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors raised while running the tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The wall-clock timeout elapsed before the program exited.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Waiting on the program or reading its pipes failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle on the analysis tool.
#[derive(Debug, Clone)]
pub struct VolatilityTool {
    program: PathBuf,
    prefix_args: Vec<String>,
}

impl VolatilityTool {
    /// Create a handle for `program`, inserting `prefix_args` before every
    /// invocation's own arguments.
    pub fn new(program: impl Into<PathBuf>, prefix_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args,
        }
    }

    /// Run the tool and return its raw standard output.
    ///
    /// A non-zero exit status is not an error: forensic plugins often print
    /// useful partial output before failing. With a timeout, the child is
    /// killed once it elapses.
    pub async fn run(
        &self,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, ToolError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ToolError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ToolError::Timeout(limit))??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                "Tool exited with {:?} ({} bytes stdout): {}",
                output.status.code(),
                output.stdout.len(),
                stderr.trim()
            );
        }

        Ok(output.stdout)
    }
}

/// Decode tool output as UTF-8, falling back to Latin-1.
///
/// Decoding never fails: every byte maps to a character in the fallback.
pub fn decode_output(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_utf8_is_lossless() {
        let text = "PID 1 init\nпроцесс ✓\n";
        assert_eq!(decode_output(text.as_bytes()), text);
    }

    #[test]
    fn test_decode_invalid_utf8_falls_back() {
        let bytes = [0xff, 0xfe, b'a', b'b', b'c', 0xe9];
        assert_eq!(decode_output(&bytes), "ÿþabcé");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout_despite_exit_code() {
        let tool = VolatilityTool::new(
            "/bin/sh",
            vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()],
        );
        let stdout = tool.run(&[], Some(Duration::from_secs(10))).await.unwrap();
        assert_eq!(stdout, b"out\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_times_out() {
        let tool = VolatilityTool::new("/bin/sh", vec!["-c".to_string(), "sleep 5".to_string()]);
        let err = tool
            .run(&[], Some(Duration::from_millis(200)))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let tool = VolatilityTool::new("/nonexistent/volsweep-test-tool", vec![]);
        let err = tool.run(&[], None).await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
