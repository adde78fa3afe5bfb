//! Typed errors for the digest pipeline.
//!
//! Uses `thiserror` so every failure mode stays distinguishable and the
//! `Display` message doubles as the user-facing report, remedy included.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Bad or missing site registry, or a missing credential.
    #[error("config error: {0}")]
    Config(String),

    /// Cached mode was requested but no snapshot exists.
    #[error("no article cache at {} (run in live mode first to populate it)", path.display())]
    CacheMiss { path: PathBuf },

    /// A snapshot exists but could not be read, parsed, or written.
    #[error("article cache {}: {reason}", path.display())]
    Cache { path: PathBuf, reason: String },

    /// The crawl service failed for one site; the whole run aborts.
    #[error("crawl failed for {url} (limit {limit}): {reason}")]
    Crawl {
        url: String,
        limit: u32,
        reason: String,
    },

    /// Zero articles where at least one is required.
    #[error("no articles to summarize")]
    EmptyInput,

    /// Prompt template resource missing or invalid.
    #[error("prompt template error: {0}")]
    Template(String),

    /// The completion call failed or returned no usable content.
    #[error("completion failed: {reason}")]
    Llm { reason: String },
}

impl From<minijinja::Error> for DigestError {
    fn from(e: minijinja::Error) -> Self {
        DigestError::Template(e.to_string())
    }
}

/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_miss_message_names_path_and_remedy() {
        let e = DigestError::CacheMiss {
            path: PathBuf::from("articles_cache.json"),
        };
        let msg = e.to_string();
        assert!(msg.contains("articles_cache.json"));
        assert!(msg.contains("live mode"));
    }

    #[test]
    fn test_crawl_message_names_site_and_limit() {
        let e = DigestError::Crawl {
            url: "https://a.example".to_string(),
            limit: 5,
            reason: "HTTP 500".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("https://a.example"));
        assert!(msg.contains("limit 5"));
        assert!(msg.contains("HTTP 500"));
    }
}
