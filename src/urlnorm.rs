//! URL canonicalization and the collision-resistant identifier derived from it.
//!
//! Canonical form: fragment stripped, resolved against a referrer when the
//! raw string is relative. Identifier: full SHA-256 hex digest of the
//! canonical URL string, used as the frontier's primary key.

use crate::error::CrawlError;
use sha2::{Digest, Sha256};
use url::Url;

/// A canonical URL, fragment-free and absolute.
pub type Canonical = String;

/// Resolve `raw` against `base` (if given) and strip the fragment.
///
/// Scheme, host, path, and query are otherwise left intact -- this is
/// deliberately *not* a full normalizer (no trailing-slash collapsing, no
/// percent-decoding beyond what the `url` crate does by default), matching
/// the narrow canonicalization contract the frontier relies on.
pub fn normalize(raw: &str, base: Option<&str>) -> Result<Canonical, CrawlError> {
    let mut parsed = match base {
        Some(b) => {
            let base_url = Url::parse(b).map_err(|_| CrawlError::InvalidUrl)?;
            base_url.join(raw).map_err(|_| CrawlError::InvalidUrl)?
        }
        None => Url::parse(raw).map_err(|_| CrawlError::InvalidUrl)?,
    };
    parsed.set_fragment(None);
    Ok(parsed.into())
}

/// Derive the frontier's primary key for a canonical URL: the full SHA-256
/// hex digest, 64 hex characters wide.
pub fn identifier(canonical: &Canonical) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fragment() {
        let c = normalize("https://www.ics.uci.edu/page#section", None).unwrap();
        assert_eq!(c, "https://www.ics.uci.edu/page");
    }

    #[test]
    fn resolves_relative_against_base() {
        let c = normalize("/about", Some("https://www.ics.uci.edu/dept/index.html")).unwrap();
        assert_eq!(c, "https://www.ics.uci.edu/about");
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(matches!(normalize("not a url", None), Err(CrawlError::InvalidUrl)));
    }

    #[test]
    fn identifier_is_deterministic_and_fixed_length() {
        let c = normalize("https://www.ics.uci.edu/", None).unwrap();
        let id1 = identifier(&c);
        let id2 = identifier(&c);
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 64);
    }

    #[test]
    fn different_urls_yield_different_identifiers() {
        let a = identifier(&normalize("https://www.ics.uci.edu/a", None).unwrap());
        let b = identifier(&normalize("https://www.ics.uci.edu/b", None).unwrap());
        assert_ne!(a, b);
    }
}
