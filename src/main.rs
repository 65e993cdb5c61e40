//! emploi-crawler binary: one-shot crawl of emploitogo.info job postings.
//!
//! Exit codes: 0 on completion (recorded per-job failures included),
//! 2 on configuration errors, 1 on any other fatal failure.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use emploi_crawler::config::AppConfig;
use emploi_crawler::crawler::Crawler;
use emploi_crawler::fetcher::{HttpEngine, TokioSleeper};
use emploi_crawler::logging::init_logging;
use emploi_crawler::store::Dataset;

#[derive(Parser, Debug)]
#[command(
    name = "emploi-crawler",
    about = "Job-posting crawler for emploitogo.info",
    version
)]
struct Cli {
    /// Path to a JSON configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output dataset path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum number of listing pages to crawl (0 = unlimited)
    #[arg(long)]
    pages: Option<u32>,

    /// Only fetch postings not already present in the dataset
    #[arg(long)]
    incremental: bool,

    /// Verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };

    init_logging(&config.logging.level, cli.verbose);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path).await?,
        None => AppConfig::default(),
    };

    if let Some(output) = &cli.output {
        config.output.file = output.clone();
    }
    if let Some(pages) = cli.pages {
        config.scraper.max_pages = pages;
    }
    if cli.incremental {
        config.scraper.incremental = true;
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!(
        "starting crawl of {} (max {} pages, incremental: {})",
        config.scraper.stage_url, config.scraper.max_pages, config.scraper.incremental
    );

    let engine = Arc::new(HttpEngine::new(&config.scraper).context("failed to build transport")?);
    let crawler = Crawler::new(&config, engine, Arc::new(TokioSleeper))?;

    let mut dataset = Dataset::load(&config.output.file).await;

    let skip_keys: HashSet<String> = if config.scraper.incremental {
        dataset.keys().map(str::to_string).collect()
    } else {
        HashSet::new()
    };

    let result = crawler.run(&skip_keys).await;

    let extracted = result.records.len();
    let added = dataset.merge(result.records);
    dataset
        .write(&config.output.file, config.output.backup_enabled)
        .await
        .context("failed to persist dataset")?;

    for failure in &result.failures {
        warn!("failed: {} ({})", failure.url, failure.reason);
    }
    info!(
        "crawl finished: {} pages visited, {} records extracted ({} new), {} failures, {} total in dataset",
        result.pages_visited,
        extracted,
        added,
        result.failures.len(),
        dataset.len()
    );

    Ok(())
}
