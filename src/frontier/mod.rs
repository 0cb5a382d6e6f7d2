//! Orchestrates the durable frontier store: in-memory LIFO queue of
//! not-yet-fetched URLs, backed by the append-only log in `store.rs`.
//!
//! The LIFO ordering is deliberate: it reproduces the depth-first traversal
//! shape of the source crawler and is required for test reproducibility,
//! not an incidental choice.

mod store;

use crate::logging::LogSink;
use crate::policy;
use crate::urlnorm;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use store::FrontierFile;

struct Inner {
    /// identifier -> (canonical url, completed)
    records: HashMap<String, (String, bool)>,
    /// Not-yet-fetched URLs, LIFO (stack discipline).
    queue: Vec<String>,
    file: FrontierFile,
}

pub struct Frontier {
    inner: Mutex<Inner>,
}

impl Frontier {
    /// Open the frontier at `path`. When `restart` is true the previous
    /// file is deleted first and the queue is seeded fresh from
    /// `seed_urls`. Otherwise every incomplete, still-accepted entry from
    /// the existing file is re-enqueued, and seeds are only added if the
    /// store turns out to be empty.
    pub fn open(
        path: &Path,
        restart: bool,
        seed_urls: &[String],
        log: &dyn LogSink,
    ) -> std::io::Result<Self> {
        if restart {
            FrontierFile::delete(path)?;
        }

        let mut file = FrontierFile::open(path)?;
        let mut records = file.load()?;
        let mut queue = Vec::new();

        if restart || records.is_empty() {
            for seed in seed_urls {
                if let Ok(canonical) = urlnorm::normalize(seed, None) {
                    let id = urlnorm::identifier(&canonical);
                    if !records.contains_key(&id) {
                        file.append(&id, &canonical, false)?;
                        records.insert(id.clone(), (canonical.clone(), false));
                        queue.push(canonical);
                    }
                }
            }
        } else {
            let mut tbd = 0usize;
            let total = records.len();
            for (url, completed) in records.values() {
                if !*completed && policy::accept(url, log) {
                    queue.push(url.clone());
                    tbd += 1;
                }
            }
            log.engine_event(&format!(
                "Found {tbd} urls to be downloaded from {total} total urls discovered."
            ));
        }

        Ok(Self {
            inner: Mutex::new(Inner { records, queue, file }),
        })
    }

    /// Normalize, hash, and insert `url` if its identifier is new. Idempotent.
    pub fn add(&self, url: &str, base: Option<&str>) -> std::io::Result<()> {
        let canonical = match urlnorm::normalize(url, base) {
            Ok(c) => c,
            Err(_) => return Ok(()), // unparseable link: discarded, not an engine failure
        };
        let id = urlnorm::identifier(&canonical);

        let mut inner = self.inner.lock();
        if inner.records.contains_key(&id) {
            return Ok(());
        }
        inner.file.append(&id, &canonical, false)?;
        inner.records.insert(id, (canonical.clone(), false));
        inner.queue.push(canonical);
        Ok(())
    }

    /// Pop the most recently added URL (LIFO), or `None` if the queue is
    /// currently empty.
    pub fn next(&self) -> Option<String> {
        self.inner.lock().queue.pop()
    }

    /// Mark `url` complete and persist. Logs (does not panic) if the URL
    /// was never added, which should not happen under I1/I2.
    pub fn mark_complete(&self, url: &str, log: &dyn LogSink) -> std::io::Result<()> {
        let id = urlnorm::identifier(&url.to_string());
        let mut inner = self.inner.lock();
        if !inner.records.contains_key(&id) {
            log.engine_event(&format!("Completed url {url}, but have not seen it before."));
        }
        inner.file.append(&id, url, true)?;
        inner
            .records
            .entry(id)
            .and_modify(|r| r.1 = true)
            .or_insert_with(|| (url.to_string(), true));
        Ok(())
    }

    /// Number of URLs currently queued (not yet fetched).
    pub fn pending(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Flush and release the underlying store.
    pub fn close(&self) -> std::io::Result<()> {
        self.inner.lock().file.close()
    }
}

pub fn default_save_file() -> PathBuf {
    PathBuf::from("frontier.bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullLogSink;
    use tempfile::tempdir;

    #[test]
    fn add_is_idempotent_per_identifier() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.bin");
        let log = NullLogSink;
        let f = Frontier::open(&path, true, &[], &log).unwrap();

        f.add("https://www.ics.uci.edu/page", None).unwrap();
        f.add("https://www.ics.uci.edu/page", None).unwrap();
        f.add("https://www.ics.uci.edu/page#frag", None).unwrap();

        assert_eq!(f.pending(), 1);
    }

    #[test]
    fn next_is_lifo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.bin");
        let log = NullLogSink;
        let f = Frontier::open(&path, true, &[], &log).unwrap();

        f.add("https://www.ics.uci.edu/a", None).unwrap();
        f.add("https://www.ics.uci.edu/b", None).unwrap();

        assert_eq!(f.next().as_deref(), Some("https://www.ics.uci.edu/b"));
        assert_eq!(f.next().as_deref(), Some("https://www.ics.uci.edu/a"));
        assert_eq!(f.next(), None);
    }

    #[test]
    fn resume_without_restart_reenqueues_incomplete_and_skips_seeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.bin");
        let log = NullLogSink;

        let seeds = vec![
            "https://www.ics.uci.edu/u1".to_string(),
            "https://www.ics.uci.edu/u2".to_string(),
        ];

        let fetched_first;
        {
            let f = Frontier::open(&path, true, &seeds, &log).unwrap();
            fetched_first = f.next().unwrap();
            f.mark_complete(&fetched_first, &log).unwrap();
            f.close().unwrap();
        }

        let remaining = seeds
            .iter()
            .find(|s| **s != fetched_first)
            .unwrap()
            .clone();

        let resumed = Frontier::open(&path, false, &seeds, &log).unwrap();
        assert_eq!(resumed.pending(), 1);
        assert_eq!(resumed.next().as_deref(), Some(remaining.as_str()));
    }

    #[test]
    fn restart_deletes_prior_state_and_reseeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.bin");
        let log = NullLogSink;
        let seeds = vec!["https://www.ics.uci.edu/u1".to_string()];

        {
            let f = Frontier::open(&path, true, &seeds, &log).unwrap();
            let u1 = f.next().unwrap();
            f.mark_complete(&u1, &log).unwrap();
        }

        let restarted = Frontier::open(&path, true, &seeds, &log).unwrap();
        assert_eq!(restarted.pending(), 1);
    }
}
