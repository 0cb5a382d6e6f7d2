//! Per-host politeness: blocks a worker until at least `delay` seconds have
//! elapsed since the last request to that host.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Polling granularity when a worker has to wait for its turn. Small enough
/// to keep the observed delay close to `delay`, large enough not to spin.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub struct PolitenessGate {
    delay: Duration,
    last_access: Mutex<HashMap<String, Instant>>,
}

impl PolitenessGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_access: Mutex::new(HashMap::new()),
        }
    }

    /// Block until `host` may be accessed, then record the access time.
    ///
    /// The lock is held only while checking/updating the table; any sleep
    /// happens with the lock released so other hosts keep making progress.
    pub async fn wait(&self, host: &str) {
        loop {
            let now = Instant::now();
            let wait_for = {
                let mut table = self.last_access.lock();
                match table.get(host) {
                    Some(&last) if now.duration_since(last) < self.delay => {
                        Some(self.delay - now.duration_since(last))
                    }
                    _ => {
                        table.insert(host.to_string(), now);
                        None
                    }
                }
            };

            match wait_for {
                None => return,
                Some(remaining) => tokio::time::sleep(remaining.min(POLL_INTERVAL).max(Duration::from_millis(1))).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn sequential_waits_are_spaced_by_at_least_delay() {
        let gate = Arc::new(PolitenessGate::new(Duration::from_millis(150)));
        let start = Instant::now();

        gate.wait("a.ics.uci.edu").await;
        let t1 = start.elapsed();
        gate.wait("a.ics.uci.edu").await;
        let t2 = start.elapsed();
        gate.wait("a.ics.uci.edu").await;
        let t3 = start.elapsed();

        assert!(t1 < Duration::from_millis(150));
        assert!(t2 >= Duration::from_millis(150));
        assert!(t3 >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn different_hosts_do_not_block_each_other() {
        let gate = Arc::new(PolitenessGate::new(Duration::from_millis(150)));
        let start = Instant::now();

        gate.wait("a.ics.uci.edu").await;
        gate.wait("b.ics.uci.edu").await;
        let elapsed = start.elapsed();

        assert!(elapsed < Duration::from_millis(150));
    }
}
