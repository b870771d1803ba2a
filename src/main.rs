//! Weir main entry point
//!
//! This is the command-line interface for the Weir focused crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use weir::analytics::TrapLog;
use weir::config::{load_config_with_hash, Config, CorpusMode};
use weir::crawler::crawl;
use weir::filter::TrapFilter;
use weir::output::{print_summary, write_report};

/// Weir: a focused crawler with trap-aware link admission
///
/// Weir crawls the hosts of one target domain, rejects links that look
/// like crawler traps, and writes an analytics report of the crawl.
#[derive(Parser, Debug)]
#[command(name = "weir")]
#[command(version)]
#[command(about = "A focused crawler with trap-aware link admission", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume from the persisted frontier (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, clearing the persisted frontier
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show seed admission without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(&config, cli.fresh, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("weir=info,warn"),
            1 => EnvFilter::new("weir=debug,info"),
            2 => EnvFilter::new("weir=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the configuration and how seeds would be admitted
fn handle_dry_run(config: &Config) {
    println!("=== Weir Dry Run ===\n");

    println!("Crawl Scope:");
    println!("  Target domain: {}", config.crawler.target_domain);
    match config.crawler.max_pages {
        0 => println!("  Max pages: unlimited"),
        n => println!("  Max pages: {}", n),
    }

    println!("\nFilter:");
    println!("  Max URL length: {}", config.filter.max_url_length);
    println!("  Max query params: {}", config.filter.max_query_params);
    println!(
        "  Similarity threshold: {}",
        config.filter.similarity_threshold
    );
    println!(
        "  Recent trap window: {}",
        config.filter.recent_traps_capacity
    );
    println!(
        "  Calendar params: {}",
        config.filter.calendar_params.join(", ")
    );

    println!("\nCorpus:");
    match config.corpus.mode {
        CorpusMode::Http => println!(
            "  Live HTTP, timeout {}s",
            config.corpus.request_timeout_secs
        ),
        CorpusMode::Cache => println!(
            "  Cache directory: {}",
            config.corpus.cache_dir.as_deref().unwrap_or("")
        ),
    }

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);
    match &config.output.frontier_path {
        Some(path) => println!("  Frontier: {}", path),
        None => println!("  Frontier: in memory"),
    }

    // Seeds bypass the filter when crawling; this only shows what it would say
    let filter = TrapFilter::new(config.crawler.target_domain.as_str(), config.filter.clone());
    let mut traps = TrapLog::new(config.filter.recent_traps_capacity);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        match filter.evaluate(seed, &mut traps).reason() {
            None => println!("  ✓ {}", seed),
            Some(reason) => println!("  ✗ {} ({})", seed, reason),
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool, quiet: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (clearing persisted frontier)");
    } else {
        tracing::info!("Starting crawl (will resume a persisted frontier)");
    }

    tracing::info!(
        "Target domain: {}, seeds: {}",
        config.crawler.target_domain,
        config.crawler.seeds.len()
    );

    let report = crawl(config, fresh).await.context("crawl failed")?;

    let report_path = Path::new(&config.output.report_path);
    write_report(&report, report_path)?;
    tracing::info!("Analytics report written to {}", report_path.display());

    if !quiet {
        print_summary(&report);
    }

    Ok(())
}
