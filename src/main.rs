//! Web-Tally main entry point
//!
//! This is the command-line interface for the Web-Tally crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use web_tally::config::load_config;
use web_tally::crawler::{Crawl, HttpPageFetcher, ParallelCrawler, SystemClock};
use web_tally::output::{write_profile, write_result};
use web_tally::profiler::Profiler;
use web_tally::url::compile_patterns;

/// Web-Tally: a parallel word-counting web crawler
///
/// Crawls outward from the configured start pages until the depth or time
/// limit runs out, respecting robots.txt, then writes the most popular words
/// and a profile of where the time went.
#[derive(Parser, Debug)]
#[command(name = "web-tally")]
#[command(version)]
#[command(about = "A parallel word-counting web crawler", long_about = None)]
struct Cli {
    /// Path to JSON configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    run(&cli).with_context(|| format!("Crawl configured by {} failed", cli.config.display()))
}

/// Loads the configuration, crawls, and writes the result and profile
fn run(cli: &Cli) -> web_tally::Result<()> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.parallelism)
        .enable_all()
        .build()?;

    let profiler = Profiler::new();

    let fetcher = HttpPageFetcher::new(compile_patterns(&config.ignored_words)?)?;
    let fetcher = Arc::new(profiler.wrap(fetcher)?);
    let crawler = ParallelCrawler::new(fetcher, Arc::new(SystemClock), &config)?;
    let crawler = profiler.wrap(crawler)?;

    tracing::info!(
        "Crawling {} start page(s) with {} worker(s), max depth {}, timeout {}s",
        config.start_pages.len(),
        config.parallelism,
        config.max_depth,
        config.timeout_seconds
    );

    let result = runtime.block_on(crawler.crawl(&config.start_pages));

    tracing::info!(
        "Visited {} URL(s), reporting {} word(s)",
        result.urls_visited,
        result.word_counts.len()
    );

    write_result(&result, &config.result_path)?;
    write_profile(&profiler.report(), &config.profile_output_path)?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_tally=info,warn"),
            1 => EnvFilter::new("web_tally=debug,info"),
            2 => EnvFilter::new("web_tally=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
