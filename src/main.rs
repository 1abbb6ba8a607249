//! Binary entry point for releasedup.
//!
//! This binary runs duplicate detection over a JSON file of search results.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow unnecessary_wraps for consistent command function signatures
#![allow(clippy::unnecessary_wraps)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand, ValueEnum};
use releasedup::observability::{self, InitOptions};
use releasedup::{
    DuplicateDetectionResult, DuplicateDetector, Error, IndexerId, ReleasedupConfig,
    SearchResultItem,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Releasedup - duplicate detection for aggregated indexer search results.
#[derive(Parser)]
#[command(name = "releasedup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "RELEASEDUP_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Detect duplicates in a JSON array of search results.
    Detect {
        /// File containing the results (`-` reads stdin).
        input: PathBuf,

        /// Age difference threshold in hours.
        #[arg(long)]
        age_threshold: Option<f32>,

        /// Size difference threshold in percent.
        #[arg(long)]
        size_threshold: Option<f32>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Output formats for detection results.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned text table.
    Table,
    /// Annotated results and statistics as JSON.
    Json,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, source) = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(
        Some(&config.logging),
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    tracing::debug!(source = ?source, "Configuration loaded");

    match run_command(cli.command, config, source.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(
    command: Commands,
    config: ReleasedupConfig,
    source: Option<&Path>,
) -> releasedup::Result<()> {
    match command {
        Commands::Detect {
            input,
            age_threshold,
            size_threshold,
            format,
        } => cmd_detect(config, &input, age_threshold, size_threshold, format),

        Commands::Config { show } => cmd_config(&config, source, show),
    }
}

/// Loads configuration from an explicit path or the default locations.
///
/// An explicit path must load. Default-location files that fail to load are
/// reported on stderr and skipped.
fn load_config(path: Option<&Path>) -> releasedup::Result<(ReleasedupConfig, Option<PathBuf>)> {
    if let Some(path) = path {
        let config = ReleasedupConfig::load_from_file(path)?;
        return Ok((config, Some(path.to_path_buf())));
    }

    let loaded = ReleasedupConfig::load_default();
    for ignored in &loaded.ignored {
        eprintln!("Warning: ignoring config file {ignored}");
    }
    Ok((loaded.config, loaded.source))
}

/// Detect command.
fn cmd_detect(
    config: ReleasedupConfig,
    input: &Path,
    age_threshold: Option<f32>,
    size_threshold: Option<f32>,
    format: OutputFormat,
) -> releasedup::Result<()> {
    let mut dedup = config.dedup;
    if let Some(hours) = age_threshold {
        dedup = dedup.with_age_threshold_hours(hours);
    }
    if let Some(percent) = size_threshold {
        dedup = dedup.with_size_threshold_percent(percent);
    }
    dedup.validate()?;

    let mut items = read_results(input)?;
    let detector = DuplicateDetector::new(dedup);
    let result = detector.detect(&items);
    result.annotate(&mut items);

    match format {
        OutputFormat::Table => print_table(&items, &result),
        OutputFormat::Json => print_json(&items, &result)?,
    }

    Ok(())
}

/// Config command.
fn cmd_config(
    config: &ReleasedupConfig,
    source: Option<&Path>,
    show: bool,
) -> releasedup::Result<()> {
    if show {
        match source {
            Some(path) => println!("# source: {}", path.display()),
            None => println!("# source: defaults"),
        }
        println!("[searching]");
        println!("duplicateDetection = {}", config.dedup.enabled);
        println!(
            "duplicateAgeThreshold = {:.1}",
            config.dedup.age_threshold_hours
        );
        println!(
            "duplicateSizeThresholdInPercent = {:.1}",
            config.dedup.size_threshold_percent
        );
        println!();
        println!("[logging]");
        if let Some(format) = &config.logging.format {
            println!("format = \"{format}\"");
        }
        if let Some(filter) = &config.logging.filter {
            println!("filter = \"{filter}\"");
        }
        if let Some(file) = &config.logging.file {
            println!("file = \"{}\"", file.display());
        }
    } else {
        println!("Use --show to print the effective configuration");
    }
    Ok(())
}

/// Reads a JSON array of results from a file or stdin.
fn read_results(input: &Path) -> releasedup::Result<Vec<SearchResultItem>> {
    let contents = if input == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(input)
    }
    .map_err(|e| Error::OperationFailed {
        operation: "read_results".to_string(),
        cause: format!("{}: {e}", input.display()),
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        Error::InvalidInput(format!(
            "{} is not a JSON array of search results: {e}",
            input.display()
        ))
    })
}

/// Prints annotated results grouped by cluster, then unique hits.
fn print_table(items: &[SearchResultItem], result: &DuplicateDetectionResult) {
    println!(
        "{:>5}  {:<16}  {:>14}  {:<20}  TITLE",
        "DUP", "INDEXER", "SIZE", "PUBLISHED"
    );
    for (identifier, cluster) in result.clusters.iter().enumerate() {
        for &member in cluster.members() {
            let item = &items[member];
            println!(
                "{:>5}  {:<16}  {:>14}  {:<20}  {}",
                identifier,
                item.indexer.as_str(),
                item.size.map_or_else(|| "-".to_string(), |s| s.to_string()),
                item.pub_date.map_or_else(
                    || "-".to_string(),
                    |d| d.format("%Y-%m-%d %H:%M:%S").to_string()
                ),
                item.title
            );
        }
    }

    println!();
    println!(
        "{} results, {} clusters, {} duplicates ({} ms)",
        result.item_count,
        result.cluster_count(),
        result.duplicates_found,
        result.duration_ms
    );

    let mut hits: Vec<(&IndexerId, &usize)> = result.unique_hits.iter().collect();
    hits.sort();
    if !hits.is_empty() {
        println!();
        println!("Unique hits:");
        for (indexer, count) in hits {
            println!("  {indexer}: {count}");
        }
    }
}

/// Prints annotated results and statistics as JSON.
fn print_json(
    items: &[SearchResultItem],
    result: &DuplicateDetectionResult,
) -> releasedup::Result<()> {
    let unique_hits: std::collections::BTreeMap<&str, usize> = result
        .unique_hits
        .iter()
        .map(|(indexer, count)| (indexer.as_str(), *count))
        .collect();

    let output = serde_json::json!({
        "results": items,
        "uniqueHits": unique_hits,
        "clusterCount": result.cluster_count(),
        "duplicatesFound": result.duplicates_found,
        "durationMs": result.duration_ms,
    });

    let rendered = serde_json::to_string_pretty(&output).map_err(|e| Error::OperationFailed {
        operation: "render_json".to_string(),
        cause: e.to_string(),
    })?;
    println!("{rendered}");
    Ok(())
}
