//! Exact (SHA-256) and near (64-bit SimHash) content-duplicate detection.
//!
//! Both sets live behind a single lock so that, per page, the exact check,
//! the near check, and the two inserts that follow a "not a duplicate"
//! verdict happen atomically with respect to other workers -- the
//! exact-before-near ordering is otherwise easy to violate under
//! concurrency.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Number of bits two SimHash fingerprints may differ in and still count as
/// near-duplicates.
pub const NEAR_DUPLICATE_HAMMING_THRESHOLD: u32 = 3;

struct Inner {
    exact: HashSet<[u8; 32]>,
    near: Vec<u64>,
}

pub struct DuplicateDetector {
    inner: Mutex<Inner>,
}

/// Outcome of checking one page against both detectors.
#[derive(Debug, PartialEq, Eq)]
pub enum DuplicateVerdict {
    Unique,
    ExactDuplicate,
    NearDuplicate,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                exact: HashSet::new(),
                near: Vec::new(),
            }),
        }
    }

    /// Check `text`/`filtered_tokens` against both detectors and, if the page
    /// is unique, record both fingerprints in the same critical section.
    /// This is the only entry point workers should use -- it enforces the
    /// required exact-then-near ordering.
    pub fn check_and_record(&self, text: &str, filtered_tokens: &[&str]) -> DuplicateVerdict {
        let digest = exact_digest(text);
        let fingerprint = simhash(filtered_tokens);

        let mut inner = self.inner.lock();
        if inner.exact.contains(&digest) {
            return DuplicateVerdict::ExactDuplicate;
        }
        if inner.near.iter().any(|f| hamming_distance(*f, fingerprint) <= NEAR_DUPLICATE_HAMMING_THRESHOLD) {
            return DuplicateVerdict::NearDuplicate;
        }
        inner.exact.insert(digest);
        inner.near.push(fingerprint);
        DuplicateVerdict::Unique
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn exact_digest(text: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().into()
}

/// Compute the 64-bit SimHash of a token multiset: each token contributes
/// +1/-1 to each bit position of a running vector via its MD5 digest, and
/// the final fingerprint takes the sign of each position.
pub fn simhash(tokens: &[&str]) -> u64 {
    let mut v = [0i64; 64];
    for token in tokens {
        let digest = md5::compute(token.as_bytes());
        let h = u128::from_be_bytes(digest.0);
        for (i, slot) in v.iter_mut().enumerate() {
            if (h >> i) & 1 == 1 {
                *slot += 1;
            } else {
                *slot -= 1;
            }
        }
    }

    let mut fingerprint: u64 = 0;
    for (i, slot) in v.iter().enumerate() {
        if *slot > 0 {
            fingerprint |= 1 << i;
        }
    }
    fingerprint
}

pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_duplicate_detected_on_second_identical_text() {
        let dd = DuplicateDetector::new();
        let tokens = vec!["a", "b", "c"];
        assert_eq!(dd.check_and_record("same text", &tokens), DuplicateVerdict::Unique);
        assert_eq!(
            dd.check_and_record("same text", &tokens),
            DuplicateVerdict::ExactDuplicate
        );
    }

    #[test]
    fn near_duplicate_detected_when_tokens_match_but_markup_whitespace_differs() {
        let dd = DuplicateDetector::new();
        let tokens = vec!["alpha", "beta", "gamma"];
        assert_eq!(
            dd.check_and_record("alpha  beta gamma", &tokens),
            DuplicateVerdict::Unique
        );
        // Different raw text (extra whitespace collapses to the same tokens)
        // so the exact digest differs but the SimHash fingerprint is identical
        // (distance 0 <= 3), and it must be caught as a near-duplicate.
        assert_eq!(
            dd.check_and_record("alpha beta  gamma", &tokens),
            DuplicateVerdict::NearDuplicate
        );
    }

    #[test]
    fn simhash_is_permutation_invariant() {
        let tokens = vec!["alpha", "beta", "gamma", "delta", "epsilon"];
        let mut shuffled = tokens.clone();
        shuffled.reverse();
        assert_eq!(simhash(&tokens), simhash(&shuffled));
    }

    #[test]
    fn hamming_distance_zero_for_identical_fingerprints() {
        let tokens = vec!["x", "y", "z"];
        assert_eq!(hamming_distance(simhash(&tokens), simhash(&tokens)), 0);
    }

    #[test]
    fn very_different_token_bags_exceed_threshold() {
        let a: Vec<&str> = vec!["rust", "programming", "language", "memory", "safety"];
        let b: Vec<&str> = vec!["zebra", "quantum", "tapestry", "ocean", "violin"];
        assert!(hamming_distance(simhash(&a), simhash(&b)) > NEAR_DUPLICATE_HAMMING_THRESHOLD);
    }
}
