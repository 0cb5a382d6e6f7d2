//! src/error.rs
//!
//! Central error type for the crawler.
//!
//! Why have our own error enum?
//! - It keeps public function signatures simple: `Result<T, CrawlError>`.
//! - It lets us print friendly messages (`Display`) while still keeping debug info (`Debug`).
//! - It allows the `?` operator to convert common error types into `CrawlError` via `From`.

use std::{error::Error, fmt};

/// Top-level error type for the application.
///
/// Each variant wraps a concrete error from another library (e.g., `std::io`, `reqwest`),
/// or represents an application-specific condition. Only `Config` and
/// `Storage` are meant to be fatal (propagate out of `main`); every other
/// variant is caught and logged locally by whichever component raised it.
#[derive(Debug)]
pub enum CrawlError {
    /// Config file missing, malformed, or failed validation (empty seeds, zero threads, ...).
    Config(String),

    /// Failure opening, reading, or writing the frontier or stats file.
    Storage(String),

    /// The provided URL could not be parsed as http/https.
    InvalidUrl,

    /// Wrapper for file/stream I/O errors.
    Io(std::io::Error),

    /// Wrapper for HTTP client errors (DNS/TLS/connect/timeouts/protocol) from `reqwest`.
    Http(reqwest::Error),

    /// Wrapper for TOML deserialization errors when loading the config file.
    Toml(toml::de::Error),

    /// An async task failed to join (panic/cancellation surfaced as `JoinError`).
    Join(tokio::task::JoinError),
}

/// Human-readable error messages.
///
/// `Display` is what gets shown to users by default (e.g., when you `println!("{}", err)`).
impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlError::Config(msg) => write!(f, "configuration error: {}", msg),
            CrawlError::Storage(msg) => write!(f, "storage error: {}", msg),
            CrawlError::InvalidUrl => write!(f, "invalid url"),
            CrawlError::Io(e) => write!(f, "io error: {}", e),
            CrawlError::Http(e) => write!(f, "http error: {}", e),
            CrawlError::Toml(e) => write!(f, "toml error: {}", e),
            CrawlError::Join(e) => write!(f, "task join error: {}", e),
        }
    }
}

/// Implementing `std::error::Error` integrates with the wider error ecosystem:
/// lets callers use `Box<dyn Error>` if they choose, and enables source chaining later.
impl Error for CrawlError {}

/// Allow `std::io::Error` to be converted into `CrawlError::Io` automatically.
impl From<std::io::Error> for CrawlError {
    fn from(e: std::io::Error) -> Self {
        CrawlError::Io(e)
    }
}

/// Convert `reqwest::Error` into `CrawlError::Http`.
impl From<reqwest::Error> for CrawlError {
    fn from(e: reqwest::Error) -> Self {
        CrawlError::Http(e)
    }
}

/// Convert TOML parse errors into `CrawlError::Toml`.
impl From<toml::de::Error> for CrawlError {
    fn from(e: toml::de::Error) -> Self {
        CrawlError::Toml(e)
    }
}

/// Convert Tokio task join failures into `CrawlError::Join`.
impl From<tokio::task::JoinError> for CrawlError {
    fn from(e: tokio::task::JoinError) -> Self {
        CrawlError::Join(e)
    }
}
