//! The worker pool that drives every other component: pulls a URL from the
//! frontier, waits its turn at the politeness gate, downloads, extracts,
//! filters, dedups, records stats, and enqueues discovered links.
//!
//! Workers share everything through `Arc`; there is no per-worker state that
//! needs to survive a restart, since the frontier and stats files already do.

use crate::dedup::{DuplicateDetector, DuplicateVerdict};
use crate::fetch::Downloader;
use crate::frontier::Frontier;
use crate::logging::LogSink;
use crate::politeness::PolitenessGate;
use crate::stats::StatsAggregator;
use crate::tokenizer;
use crate::{extract, policy, urlnorm};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Everything a worker needs, bundled so `tokio::spawn` closures only carry
/// one clone instead of eight.
pub struct Engine {
    frontier: Arc<Frontier>,
    politeness: Arc<PolitenessGate>,
    duplicates: Arc<DuplicateDetector>,
    stats: Arc<StatsAggregator>,
    downloader: Arc<Downloader>,
    log: Arc<dyn LogSink>,
    stopwords: Arc<HashSet<String>>,
    stats_file: PathBuf,
    threads: usize,
    shutdown: Arc<AtomicBool>,
    idle_workers: Arc<AtomicUsize>,
}

impl Engine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frontier: Arc<Frontier>,
        politeness: Arc<PolitenessGate>,
        duplicates: Arc<DuplicateDetector>,
        stats: Arc<StatsAggregator>,
        downloader: Arc<Downloader>,
        log: Arc<dyn LogSink>,
        stopwords: Arc<HashSet<String>>,
        stats_file: PathBuf,
        threads: usize,
    ) -> Self {
        Self {
            frontier,
            politeness,
            duplicates,
            stats,
            downloader,
            log,
            stopwords,
            stats_file,
            threads,
            shutdown: Arc::new(AtomicBool::new(false)),
            idle_workers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An externally-triggerable shutdown flag (wired to SIGINT/SIGTERM).
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Run `threads` workers to completion: either the frontier drains (every
    /// worker finds it empty at once) or `shutdown` is raised.
    pub async fn run(&self) {
        let mut handles = Vec::with_capacity(self.threads);
        for id in 0..self.threads {
            let frontier = self.frontier.clone();
            let politeness = self.politeness.clone();
            let duplicates = self.duplicates.clone();
            let stats = self.stats.clone();
            let downloader = self.downloader.clone();
            let log = self.log.clone();
            let stopwords = self.stopwords.clone();
            let stats_file = self.stats_file.clone();
            let shutdown = self.shutdown.clone();
            let idle_workers = self.idle_workers.clone();
            let threads = self.threads;

            handles.push(tokio::spawn(async move {
                worker_loop(
                    id,
                    frontier,
                    politeness,
                    duplicates,
                    stats,
                    downloader,
                    log,
                    stopwords,
                    stats_file,
                    shutdown,
                    idle_workers,
                    threads,
                )
                .await;
            }));
        }

        for handle in handles {
            let _ = handle.await;
        }
    }
}

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    id: usize,
    frontier: Arc<Frontier>,
    politeness: Arc<PolitenessGate>,
    duplicates: Arc<DuplicateDetector>,
    stats: Arc<StatsAggregator>,
    downloader: Arc<Downloader>,
    log: Arc<dyn LogSink>,
    stopwords: Arc<HashSet<String>>,
    stats_file: PathBuf,
    shutdown: Arc<AtomicBool>,
    idle_workers: Arc<AtomicUsize>,
    threads: usize,
) {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let url = match frontier.next() {
            Some(url) => url,
            None => {
                // Every worker idle at once with nothing queued means the
                // frontier is drained: the crawl is over.
                let idle = idle_workers.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(IDLE_POLL_INTERVAL).await;
                let still_empty = frontier.pending() == 0;
                idle_workers.fetch_sub(1, Ordering::SeqCst);
                if idle >= threads && still_empty {
                    break;
                }
                continue;
            }
        };

        let checkpoint_due = match process_one(
            &url,
            &frontier,
            &politeness,
            &duplicates,
            &stats,
            &downloader,
            log.as_ref(),
            &stopwords,
        )
        .await
        {
            Ok(due) => due,
            Err(e) => {
                tracing::error!(worker = id, %url, error = %e, "error processing url, skipping");
                false
            }
        };

        if let Err(e) = frontier.mark_complete(&url, log.as_ref()) {
            tracing::error!(worker = id, %url, error = %e, "failed to persist completion");
        }

        if checkpoint_due {
            if let Err(e) = stats.checkpoint(&stats_file) {
                log.engine_event(&format!("Failed to checkpoint stats: {e}"));
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn process_one(
    url: &str,
    frontier: &Frontier,
    politeness: &PolitenessGate,
    duplicates: &DuplicateDetector,
    stats: &StatsAggregator,
    downloader: &Downloader,
    log: &dyn LogSink,
    stopwords: &HashSet<String>,
) -> Result<bool, crate::error::CrawlError> {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();

    politeness.wait(&host).await;

    let response = downloader.download(url).await?;
    if response.status != 200 || !response.is_html() {
        return Ok(false);
    }

    let html = String::from_utf8_lossy(&response.content);
    let page = extract::extract(&html);

    let tokens = tokenizer::tokenize(&page.text);
    let filtered = tokenizer::filter_tokens(&tokens, stopwords);

    match duplicates.check_and_record(&page.text, &filtered) {
        DuplicateVerdict::ExactDuplicate | DuplicateVerdict::NearDuplicate => {
            return Ok(false);
        }
        DuplicateVerdict::Unique => {}
    }

    let checkpoint_due = stats.record(&response.url, &host, &filtered);

    for link in &page.links {
        let canonical = match urlnorm::normalize(link, Some(&response.url)) {
            Ok(c) => c,
            Err(_) => continue,
        };
        if policy::accept(&canonical, log) {
            frontier.add(&canonical, None)?;
        }
    }

    Ok(checkpoint_due)
}
