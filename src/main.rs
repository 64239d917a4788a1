//! VolSweep - parallel Volatility plugin sweeps over a memory image
//!
//! A CLI tool that runs a catalog of Volatility plugins against one memory
//! image, persists each plugin's output and assembles a Markdown report.
//!
//! Exit codes:
//!   0 - The sweep completed (individual plugins may still have failed)
//!   1 - Runtime error (bad arguments, unreadable task list, report write failure, etc.)

mod analysis;
mod catalog;
mod cli;
mod completion;
mod config;
mod dispatch;
mod models;
mod pipeline;
mod progress;
mod report;
mod tool;
mod workspace;

#[cfg(test)]
mod test_support;

use analysis::{slowest_tasks, unfinished_tasks, OutcomeTally};
use anyhow::{Context, Result};
use catalog::{InvocationContext, TaskCatalog, FILTER_TERMS};
use chrono::Utc;
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use dispatch::{default_concurrency, DispatchConfig, Dispatcher};
use models::RunSummary;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tool::dumpfiles::{dump_files, DumpRequest};
use tool::VolatilityTool;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Task list written by `--init-config`.
const DEFAULT_TASK_LIST: &str = include_str!("../tasklist.cfg");

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("VolSweep v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Sweep failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .volsweep.toml and task list.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;
    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);

    let tasks_path = Path::new(&Config::default().tasks.file).to_path_buf();
    if tasks_path.exists() {
        println!("   Keeping existing {}.", tasks_path.display());
    } else {
        std::fs::write(&tasks_path, DEFAULT_TASK_LIST)
            .with_context(|| format!("Failed to write {}", tasks_path.display()))?;
        println!("✅ Created {} with the default plugins.", tasks_path.display());
    }

    println!("   Edit them to set the tool path, timeout and plugin list.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout stays clean for `--json`.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete sweep workflow.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();
    let started_at = Utc::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let image = args.image().to_path_buf();
    let tool = VolatilityTool::new(&config.tool.path, config.tool.args.clone());

    // Handle --dumpfiles: extract one file object and exit
    if args.dumpfiles {
        return handle_dumpfiles(&args, &tool, &image).await;
    }

    let output_dir = config
        .general
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace::default_output_dir(&image));
    workspace::prepare_output_dir(&output_dir)?;

    // Step 1: Read the task list before anything touches the image
    let tasks_path = Path::new(&config.tasks.file);
    let entries = catalog::read_task_list(tasks_path)
        .with_context(|| format!("Failed to load task list {}", tasks_path.display()))?;
    info!("Loaded {} plugins from {}", entries.len(), tasks_path.display());

    // Step 2: Resolve the profile
    let profile = resolve_profile(&args, &tool, &image).await?;

    // Step 3: Build the catalog
    let ctx = InvocationContext {
        profile: profile.clone(),
        image: image.display().to_string(),
    };
    let catalog = TaskCatalog::build(entries, FILTER_TERMS, &ctx);

    let dispatch_config = DispatchConfig {
        concurrency: config
            .general
            .concurrency
            .unwrap_or_else(default_concurrency),
        timeout: Duration::from_secs(config.tool.timeout_seconds),
    };

    if !args.quiet && !args.json {
        println!("🧠 Sweeping memory image: {}", image.display());
        println!("   Profile: {}", profile);
        println!("   Tasks: {}", catalog.len());
        println!("   Concurrency: {}", dispatch_config.concurrency);
        println!("   Timeout: {}s", config.tool.timeout_seconds);
        println!("   Output: {}\n", output_dir.display());
    }

    let dispatcher = Dispatcher::new(tool, output_dir.clone(), dispatch_config);

    // Step 4: Dispatch unfinished tasks and rebuild the report
    let result = pipeline::run_sweep(
        &catalog,
        &dispatcher,
        &output_dir,
        &config.general.report_name,
        !args.quiet && !args.json,
    )
    .await?;
    debug!("{} progress notifications", result.notifications);

    // Step 5: Summarize
    let tally = OutcomeTally::from_runs(&result.runs);
    debug!("{} tasks dispatched this run", tally.total());
    let summary = RunSummary {
        image,
        profile,
        output_dir,
        report_path: result.report_path.clone(),
        started_at,
        duration_seconds: start_time.elapsed().as_secs_f64(),
        total_tasks: catalog.len(),
        skipped: result.skipped,
        succeeded: tally.succeeded,
        empty: tally.empty,
        timed_out: tally.timed_out,
        failed: tally.failed,
        unfinished: unfinished_tasks(&result.runs),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize run summary")?;
        println!("{}", json);
    } else if !args.quiet {
        print_summary(&summary, &result.runs);
    }

    Ok(())
}

/// Print the human-readable run summary.
fn print_summary(summary: &RunSummary, runs: &[models::TaskRun]) {
    println!("\n📊 Sweep Summary:");
    println!("   Tasks in catalog: {}", summary.total_tasks);
    println!("   Already complete: {}", summary.skipped);
    println!(
        "   - ✅ Saved: {} | ⚪ No output: {} | ⏱️ Timed out: {} | ❌ Failed: {}",
        summary.succeeded, summary.empty, summary.timed_out, summary.failed
    );

    let slowest = slowest_tasks(runs, 3);
    if !slowest.is_empty() {
        println!("   Slowest plugins:");
        for (name, elapsed) in slowest {
            println!("     🐢 {} ({:.1}s)", name, elapsed.as_secs_f64());
        }
    }

    if !summary.unfinished.is_empty() {
        println!("   Re-run to retry: {}", summary.unfinished.join(", "));
    }

    println!("   Duration: {:.1}s", summary.duration_seconds);
    println!(
        "\n✅ Sweep complete! Report saved to: {}",
        summary.report_path.display()
    );
}

/// Handle --dumpfiles: extract one file object and print the tool output.
async fn handle_dumpfiles(args: &Args, tool: &VolatilityTool, image: &Path) -> Result<()> {
    let location = args
        .dumpfiles_location
        .as_deref()
        .context("--dumpfiles requires --dumpfiles-location")?;
    let profile = resolve_profile(args, tool, image).await?;

    std::fs::create_dir_all(&args.dump_dir).with_context(|| {
        format!(
            "Failed to create dump directory: {}",
            args.dump_dir.display()
        )
    })?;

    let request = DumpRequest {
        image,
        profile: &profile,
        location,
        dump_dir: &args.dump_dir,
    };
    let output = dump_files(tool, &request).await?;

    print!("{}", output);
    Ok(())
}

/// Use the given profile, or detect one with imageinfo.
async fn resolve_profile(args: &Args, tool: &VolatilityTool, image: &Path) -> Result<String> {
    match args.profile {
        Some(ref profile) => {
            debug!("Using profile from command line: {}", profile);
            Ok(profile.clone())
        }
        None => tool::profile::detect_profile(tool, image).await,
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
