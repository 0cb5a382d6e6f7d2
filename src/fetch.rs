//! Concrete `reqwest`-based HTTP downloader: fetches a URL and returns its
//! status, headers, and body, or an error.

use crate::error::CrawlError;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// The fixed record type the engine consumes, replacing the duck-typed
/// response object from the original source.
pub struct FetchResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub content: Vec<u8>,
    pub url: String,
}

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url`. Network/protocol failures surface as `Err`; the engine
    /// treats them as a per-URL skip, not a fatal error.
    pub async fn download(&self, url: &str) -> Result<FetchResponse, CrawlError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in resp.headers().iter() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), v.to_string());
            }
        }
        let final_url = resp.url().to_string();
        let content = resp.bytes().await?.to_vec();

        Ok(FetchResponse {
            status,
            headers,
            content,
            url: final_url,
        })
    }
}

impl FetchResponse {
    pub fn is_html(&self) -> bool {
        self.headers
            .get("content-type")
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_html_checks_content_type_case_insensitively() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "Text/HTML; charset=utf-8".to_string());
        let resp = FetchResponse {
            status: 200,
            headers,
            content: vec![],
            url: "https://example.com".to_string(),
        };
        assert!(resp.is_html());
    }

    #[test]
    fn is_html_false_when_header_missing() {
        let resp = FetchResponse {
            status: 200,
            headers: HashMap::new(),
            content: vec![],
            url: "https://example.com".to_string(),
        };
        assert!(!resp.is_html());
    }
}
