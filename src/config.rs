//! Loads and validates the TOML configuration file. Any failure here is a
//! `CrawlError::Config`, fatal at startup.

use crate::error::CrawlError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_stats_file() -> PathBuf {
    PathBuf::from("stats.json")
}
fn default_save_frequency() -> usize {
    100
}
fn default_user_agent() -> String {
    "crawlkit/0.1 (+https://example.invalid/bot)".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_engine_log_file() -> PathBuf {
    PathBuf::from("crawl.log")
}
fn default_rejected_log_file() -> PathBuf {
    PathBuf::from("filtered_urls.log")
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub seed_urls: Vec<String>,
    pub save_file: PathBuf,
    pub time_delay: f64,
    pub threads: usize,

    #[serde(default)]
    pub restart: bool,

    #[serde(default = "default_stats_file")]
    pub stats_file: PathBuf,

    #[serde(default = "default_save_frequency")]
    pub save_frequency: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub stopwords_file: Option<PathBuf>,

    #[serde(default = "default_engine_log_file")]
    pub engine_log_file: PathBuf,

    #[serde(default = "default_rejected_log_file")]
    pub rejected_log_file: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CrawlError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CrawlError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.seed_urls.is_empty() {
            return Err(CrawlError::Config("seed_urls must not be empty".into()));
        }
        for seed in &self.seed_urls {
            let parsed = url::Url::parse(seed)
                .map_err(|_| CrawlError::Config(format!("invalid seed url: {seed}")))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(CrawlError::Config(format!(
                    "seed url must be http/https: {seed}"
                )));
            }
        }
        if self.threads == 0 {
            return Err(CrawlError::Config("threads must be >= 1".into()));
        }
        if self.time_delay < 0.0 {
            return Err(CrawlError::Config("time_delay must be >= 0".into()));
        }
        if self.save_frequency == 0 {
            return Err(CrawlError::Config("save_frequency must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_minimal_valid_config_with_defaults() {
        let dir = tempdir().unwrap();
        let path = write(
            &dir,
            r#"
            seed_urls = ["https://www.ics.uci.edu/"]
            save_file = "frontier.bin"
            time_delay = 0.5
            threads = 4
            "#,
        );
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.save_frequency, 100);
        assert_eq!(cfg.stats_file, PathBuf::from("stats.json"));
    }

    #[test]
    fn rejects_empty_seed_urls() {
        let dir = tempdir().unwrap();
        let path = write(
            &dir,
            r#"
            seed_urls = []
            save_file = "frontier.bin"
            time_delay = 0.5
            threads = 4
            "#,
        );
        assert!(matches!(Config::load(&path), Err(CrawlError::Config(_))));
    }

    #[test]
    fn rejects_zero_threads() {
        let dir = tempdir().unwrap();
        let path = write(
            &dir,
            r#"
            seed_urls = ["https://www.ics.uci.edu/"]
            save_file = "frontier.bin"
            time_delay = 0.5
            threads = 0
            "#,
        );
        assert!(matches!(Config::load(&path), Err(CrawlError::Config(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "this is not valid toml {{{");
        assert!(matches!(Config::load(&path), Err(CrawlError::Toml(_))));
    }
}
