//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// VolSweep - run a catalog of Volatility plugins against a memory image
///
/// Every plugin runs as its own tool process, several at a time. Each
/// plugin's output is saved to `<output dir>/<plugin>.txt`, and plugins
/// whose output already exists are skipped, so an interrupted sweep can be
/// re-run. A Markdown summary of all outputs is rebuilt at the end.
///
/// Examples:
///   volsweep /cases/42/mem.raw
///   volsweep /cases/42/mem.raw --profile Win7SP1x64 --timeout 300
///   volsweep mem.raw --volatility-path python2 --concurrency 4
///   volsweep mem.raw --dumpfiles --dumpfiles-location 0x7e410890
///   volsweep --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the memory image
    #[arg(value_name = "MEMORY_IMAGE", required_unless_present = "init_config")]
    pub memory_image: Option<PathBuf>,

    /// Volatility profile (detected with imageinfo when omitted)
    #[arg(short, long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Extract a single file with dumpfiles instead of running the sweep
    #[arg(long, requires = "dumpfiles_location")]
    pub dumpfiles: bool,

    /// Physical offset of the file object to extract
    #[arg(long, value_name = "OFFSET")]
    pub dumpfiles_location: Option<String>,

    /// Directory that extracted files are written to
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub dump_dir: PathBuf,

    /// Per-plugin timeout in seconds (default: from config or 120)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to the Volatility executable
    #[arg(long, value_name = "PATH", env = "VOLSWEEP_TOOL")]
    pub volatility_path: Option<String>,

    /// Task list with one `plugin-description` per line
    #[arg(long, value_name = "FILE")]
    pub tasks: Option<PathBuf>,

    /// Output directory (default: `output` next to the image)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of plugins run at once (default: number of CPUs)
    #[arg(long, value_name = "NUM")]
    pub concurrency: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .volsweep.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run summary as JSON when done
    #[arg(long)]
    pub json: bool,

    /// Generate a default .volsweep.toml and tasklist.cfg
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        let image = self
            .memory_image
            .as_ref()
            .ok_or_else(|| "A memory image path is required".to_string())?;
        if !image.exists() {
            return Err(format!("Memory image does not exist: {}", image.display()));
        }
        if !image.is_file() {
            return Err(format!("Memory image is not a file: {}", image.display()));
        }

        if self.dumpfiles && self.dumpfiles_location.is_none() {
            return Err("--dumpfiles requires --dumpfiles-location".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err("Concurrency must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The validated memory image path.
    pub fn image(&self) -> &std::path::Path {
        self.memory_image.as_deref().unwrap_or(std::path::Path::new(""))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    pub(crate) fn make_args() -> Args {
        Args {
            memory_image: Some(PathBuf::from("/data/mem.img")),
            profile: None,
            dumpfiles: false,
            dumpfiles_location: None,
            dump_dir: PathBuf::from("."),
            timeout: None,
            volatility_path: None,
            tasks: None,
            output_dir: None,
            concurrency: None,
            config: None,
            verbose: false,
            quiet: false,
            json: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_existing_image() {
        let image = NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.memory_image = Some(image.path().to_path_buf());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_image() {
        let mut args = make_args();
        args.memory_image = Some(PathBuf::from("/nonexistent/volsweep/mem.img"));
        assert!(args.validate().is_err());

        args.memory_image = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_directory_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut args = make_args();
        args.memory_image = Some(dir.path().to_path_buf());
        assert!(args.validate().unwrap_err().contains("not a file"));
    }

    #[test]
    fn test_validation_limits() {
        let image = NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.memory_image = Some(image.path().to_path_buf());

        args.timeout = Some(0);
        assert!(args.validate().is_err());
        args.timeout = Some(1);

        args.concurrency = Some(0);
        assert!(args.validate().is_err());
        args.concurrency = Some(8);

        args.dumpfiles = true;
        assert!(args.validate().is_err());
        args.dumpfiles_location = Some("0x7e410890".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let image = NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.memory_image = Some(image.path().to_path_buf());
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "volsweep",
            "/data/mem.img",
            "--profile",
            "Win10x64_19041",
            "--timeout",
            "60",
            "--concurrency",
            "2",
        ])
        .unwrap();
        assert_eq!(args.image(), std::path::Path::new("/data/mem.img"));
        assert_eq!(args.profile.as_deref(), Some("Win10x64_19041"));
        assert_eq!(args.timeout, Some(60));
        assert_eq!(args.concurrency, Some(2));

        assert!(Args::try_parse_from(["volsweep"]).is_err());
        assert!(Args::try_parse_from(["volsweep", "--init-config"]).is_ok());
        assert!(Args::try_parse_from(["volsweep", "mem.img", "--dumpfiles"]).is_err());
    }
}
