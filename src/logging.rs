//! Structured logging (`tracing`) plus two plain-file log sinks: a
//! human-readable engine log and a filtered-URL rejection log.
//!
//! The sinks are behind a trait so tests can capture output instead of
//! touching the filesystem.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Injectable sink for the two log streams the engine produces.
pub trait LogSink: Send + Sync {
    /// Record one policy rejection: `[<host>] Motivo: <reason> -> <url>`.
    fn rejected(&self, host: &str, reason: &str, url: &str);

    /// Record one human-readable engine lifecycle line (also mirrored to `tracing`).
    fn engine_event(&self, message: &str);
}

/// Discards everything. Useful in unit tests that only care about the
/// return value of a predicate, not its logging side effect.
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn rejected(&self, _host: &str, _reason: &str, _url: &str) {}
    fn engine_event(&self, _message: &str) {}
}

/// Captures every call in memory; used by tests that assert on log content.
#[derive(Default)]
pub struct MemoryLogSink {
    pub rejections: Mutex<Vec<String>>,
    pub events: Mutex<Vec<String>>,
}

impl LogSink for MemoryLogSink {
    fn rejected(&self, host: &str, reason: &str, url: &str) {
        self.rejections
            .lock()
            .push(format!("[{}] Motivo: {} \u{2192} {}", host, reason, url));
    }

    fn engine_event(&self, message: &str) {
        self.events.lock().push(message.to_string());
    }
}

/// Appends to two plain files on disk, mirroring engine events through
/// `tracing::info!` as well so both an operator tailing the log file and one
/// watching `RUST_LOG` output see the same lifecycle.
pub struct FileLogSink {
    rejected_log: Mutex<std::fs::File>,
    engine_log: Mutex<std::fs::File>,
}

impl FileLogSink {
    pub fn open(rejected_log_path: &Path, engine_log_path: &Path) -> std::io::Result<Self> {
        let rejected_log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(rejected_log_path)?;
        let engine_log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(engine_log_path)?;
        Ok(Self {
            rejected_log: Mutex::new(rejected_log),
            engine_log: Mutex::new(engine_log),
        })
    }
}

impl LogSink for FileLogSink {
    fn rejected(&self, host: &str, reason: &str, url: &str) {
        let line = format!("[{}] Motivo: {} \u{2192} {}\n", host, reason, url);
        let mut f = self.rejected_log.lock();
        let _ = f.write_all(line.as_bytes());
        tracing::debug!(%host, %reason, %url, "rejected url");
    }

    fn engine_event(&self, message: &str) {
        let mut f = self.engine_log.lock();
        let _ = writeln!(f, "{}", message);
        tracing::info!("{}", message);
    }
}

/// Initialize the global `tracing` subscriber. `verbose` maps to `debug`
/// level, otherwise `info`; both are overridable via `RUST_LOG`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_rejection_with_fixed_format() {
        let sink = MemoryLogSink::default();
        sink.rejected("example.com", "Invalid Scheme", "ftp://example.com/x");
        let recorded = sink.rejections.lock();
        assert_eq!(
            recorded[0],
            "[example.com] Motivo: Invalid Scheme \u{2192} ftp://example.com/x"
        );
    }
}
