//! Entry point for the crawlkit binary.
//!
//! Responsibilities:
//!   1) Declare the modules the binary is made of.
//!   2) Parse CLI flags and load + validate the TOML config.
//!   3) Wire up logging, the frontier, the politeness gate, stats, dedup, and
//!      the downloader, then hand them to the worker pool.
//!   4) Install a signal handler so SIGINT/SIGTERM trigger a clean shutdown:
//!      the frontier and stats are already durable after every write, so
//!      shutdown only needs to stop spawning new work and let in-flight
//!      requests finish.

mod args;
mod config;
mod dedup;
mod engine;
mod error;
mod extract;
mod fetch;
mod frontier;
mod logging;
mod policy;
mod politeness;
mod stats;
mod tokenizer;
mod urlnorm;

use args::Args;
use clap::Parser;
use config::Config;
use dedup::DuplicateDetector;
use engine::Engine;
use error::CrawlError;
use fetch::Downloader;
use frontier::Frontier;
use logging::FileLogSink;
use politeness::PolitenessGate;
use stats::StatsAggregator;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CrawlError> {
    let mut config = Config::load(&args.config)?;
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if args.restart {
        config.restart = true;
    }
    config.validate()?;

    let log: Arc<dyn logging::LogSink> = Arc::new(
        FileLogSink::open(&config.rejected_log_file, &config.engine_log_file)
            .map_err(|e| CrawlError::Storage(e.to_string()))?,
    );

    let frontier = Arc::new(
        Frontier::open(&config.save_file, config.restart, &config.seed_urls, log.as_ref())
            .map_err(|e| CrawlError::Storage(e.to_string()))?,
    );

    let stats = Arc::new(StatsAggregator::new(config.save_frequency));
    if !config.restart {
        let _ = stats.reload(&config.stats_file);
    }

    let stopwords = Arc::new(
        tokenizer::load_stopwords(config.stopwords_file.as_deref())
            .map_err(|e| CrawlError::Storage(e.to_string()))?,
    );

    let politeness = Arc::new(PolitenessGate::new(Duration::from_secs_f64(config.time_delay)));
    let duplicates = Arc::new(DuplicateDetector::new());
    let downloader = Arc::new(Downloader::new(
        &config.user_agent,
        Duration::from_secs(config.request_timeout_secs),
    )?);

    log.engine_event(&format!(
        "Starting crawl with {} threads, {} seed url(s).",
        config.threads,
        config.seed_urls.len()
    ));

    let engine = Engine::new(
        frontier.clone(),
        politeness,
        duplicates,
        stats.clone(),
        downloader,
        log.clone(),
        stopwords,
        config.stats_file.clone(),
        config.threads,
    );

    let shutdown = engine.shutdown_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.store(true, Ordering::Relaxed);
    });

    engine.run().await;

    log.engine_event("Crawl finished, flushing frontier and stats.");
    frontier
        .close()
        .map_err(|e| CrawlError::Storage(e.to_string()))?;
    stats
        .checkpoint(&config.stats_file)
        .map_err(|e| CrawlError::Storage(e.to_string()))?;

    Ok(())
}
