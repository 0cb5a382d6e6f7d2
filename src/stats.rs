//! Corpus statistics: token frequencies, per-subdomain page counts, the
//! longest page seen, and per-page word counts, with periodic JSON
//! checkpointing so a restarted crawl resumes with the prior run's numbers.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// The well-known subdomain every `subdomain_counter` entry must fall under.
const ICS_UCI_SUFFIX: &str = "ics.uci.edu";

struct Inner {
    word_counter: HashMap<String, u64>,
    subdomain_counter: BTreeMap<String, u64>,
    word_in_page: HashMap<String, usize>,
    most_word_in_page: (String, usize),
}

pub struct StatsAggregator {
    inner: Mutex<Inner>,
    save_frequency: usize,
}

/// The public, lossy JSON snapshot format: only the top 50 words are kept
/// here, by design, for forward compatibility with tooling that already
/// reads this schema. `subdomains` is a `BTreeMap` so its keys serialize in
/// sorted order rather than hash order.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StatsSnapshot {
    pub unique_pages: usize,
    pub most_word_in_page: MostWordInPage,
    pub top_50_words: Vec<(String, u64)>,
    pub subdomains: BTreeMap<String, u64>,
    pub word_in_page: HashMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct MostWordInPage {
    pub url: String,
    pub word_count: usize,
}

impl StatsAggregator {
    pub fn new(save_frequency: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                word_counter: HashMap::new(),
                subdomain_counter: BTreeMap::new(),
                word_in_page: HashMap::new(),
                most_word_in_page: (String::new(), 0),
            }),
            save_frequency: save_frequency.max(1),
        }
    }

    /// Record one successfully processed, non-duplicate page.
    ///
    /// Returns `true` when this record should trigger a checkpoint (every
    /// `save_frequency` successful records, matching the source's
    /// `len(word_in_page) % save_frequency == 0` behavior).
    pub fn record(&self, url: &str, host: &str, filtered_tokens: &[&str]) -> bool {
        let mut inner = self.inner.lock();

        for token in filtered_tokens {
            *inner.word_counter.entry((*token).to_string()).or_insert(0) += 1;
        }

        let word_count = filtered_tokens.len();
        inner.word_in_page.insert(url.to_string(), word_count);

        if word_count > inner.most_word_in_page.1 {
            inner.most_word_in_page = (url.to_string(), word_count);
        }

        if host == ICS_UCI_SUFFIX || host.ends_with(&format!(".{ICS_UCI_SUFFIX}")) {
            *inner.subdomain_counter.entry(host.to_string()).or_insert(0) += 1;
        }

        inner.word_in_page.len() % self.save_frequency == 0
    }

    pub fn unique_pages(&self) -> usize {
        self.inner.lock().word_in_page.len()
    }

    /// Build the public snapshot (top 50 words by count, ties broken
    /// lexicographically for a deterministic order).
    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        let mut words: Vec<(String, u64)> = inner
            .word_counter
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(50);

        StatsSnapshot {
            unique_pages: inner.word_in_page.len(),
            most_word_in_page: MostWordInPage {
                url: inner.most_word_in_page.0.clone(),
                word_count: inner.most_word_in_page.1,
            },
            top_50_words: words,
            subdomains: inner.subdomain_counter.clone(),
            word_in_page: inner.word_in_page.clone(),
        }
    }

    /// Write the public JSON snapshot and the internal full-counter side
    /// file: the public schema stays lossy (top 50 words), but the side
    /// file lets a resumed run recover the exact word counter instead.
    pub fn checkpoint(&self, stats_file: &Path) -> std::io::Result<()> {
        let snapshot = self.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(stats_file, json)?;

        let full_counter = self.inner.lock().word_counter.clone();
        let side_path = full_counter_path(stats_file);
        let encoded = bincode::serialize(&full_counter)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(side_path, encoded)?;
        Ok(())
    }

    /// Reload a prior checkpoint. Conflict policy: union the mappings,
    /// overwrite `word_in_page[url]` with the loaded value, and keep the
    /// larger `most_word_in_page`. The full word counter is restored from
    /// the side file when present, falling back to the lossy top-50 list.
    pub fn reload(&self, stats_file: &Path) -> std::io::Result<()> {
        if !stats_file.exists() {
            return Ok(());
        }
        let text = std::fs::read_to_string(stats_file)?;
        let snapshot: StatsSnapshot = serde_json::from_str(&text)?;

        let mut inner = self.inner.lock();
        for (url, count) in snapshot.word_in_page {
            inner.word_in_page.insert(url, count);
        }
        for (host, count) in snapshot.subdomains {
            *inner.subdomain_counter.entry(host).or_insert(0) += count;
        }
        if snapshot.most_word_in_page.word_count > inner.most_word_in_page.1 {
            inner.most_word_in_page =
                (snapshot.most_word_in_page.url, snapshot.most_word_in_page.word_count);
        }

        let side_path = full_counter_path(stats_file);
        if let Ok(bytes) = std::fs::read(&side_path) {
            if let Ok(full) = bincode::deserialize::<HashMap<String, u64>>(&bytes) {
                for (token, count) in full {
                    *inner.word_counter.entry(token).or_insert(0) += count;
                }
                return Ok(());
            }
        }
        for (token, count) in snapshot.top_50_words {
            *inner.word_counter.entry(token).or_insert(0) += count;
        }
        Ok(())
    }
}

fn full_counter_path(stats_file: &Path) -> std::path::PathBuf {
    let mut path = stats_file.to_path_buf();
    let name = path
        .file_name()
        .map(|n| format!("{}.words.bincode", n.to_string_lossy()))
        .unwrap_or_else(|| "stats.words.bincode".to_string());
    path.set_file_name(name);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_tracks_longest_page_and_subdomain_counts() {
        let stats = StatsAggregator::new(100);
        stats.record("https://a.ics.uci.edu/1", "a.ics.uci.edu", &["hello", "world"]);
        stats.record(
            "https://b.ics.uci.edu/2",
            "b.ics.uci.edu",
            &["hello", "there", "friend"],
        );

        let snap = stats.snapshot();
        assert_eq!(snap.unique_pages, 2);
        assert_eq!(snap.most_word_in_page.url, "https://b.ics.uci.edu/2");
        assert_eq!(snap.most_word_in_page.word_count, 3);
        assert_eq!(snap.subdomains.get("a.ics.uci.edu"), Some(&1));
        assert_eq!(snap.subdomains.get("b.ics.uci.edu"), Some(&1));
    }

    #[test]
    fn non_ics_host_does_not_update_subdomain_counter() {
        let stats = StatsAggregator::new(100);
        stats.record("https://example.com/1", "example.com", &["hello"]);
        assert!(stats.snapshot().subdomains.is_empty());
    }

    #[test]
    fn checkpoint_then_reload_round_trips_public_fields() {
        let dir = tempdir().unwrap();
        let stats_file = dir.path().join("stats.json");

        let stats = StatsAggregator::new(100);
        stats.record("https://a.ics.uci.edu/1", "a.ics.uci.edu", &["hello", "world"]);
        stats.checkpoint(&stats_file).unwrap();
        let before = stats.snapshot();

        let fresh = StatsAggregator::new(100);
        fresh.reload(&stats_file).unwrap();
        let after = fresh.snapshot();

        assert_eq!(before.unique_pages, after.unique_pages);
        assert_eq!(before.most_word_in_page.url, after.most_word_in_page.url);
        assert_eq!(before.subdomains, after.subdomains);
        assert_eq!(before.top_50_words, after.top_50_words);
    }

    #[test]
    fn record_signals_checkpoint_at_save_frequency() {
        let stats = StatsAggregator::new(2);
        assert!(!stats.record("u1", "h", &["a"]));
        assert!(stats.record("u2", "h", &["b"]));
    }
}
