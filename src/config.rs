//! Runtime configuration resolved once at startup.
//!
//! All credentials and endpoint overrides come from the process environment
//! (a `.env` file is honored by `main`). The resulting [`Config`] value is
//! passed explicitly into each adapter's constructor; nothing reads the
//! environment after startup.

use std::env;
use std::fmt;

use crate::error::{DigestError, Result};
use crate::pipeline::RunMode;

/// Default base URL for the Firecrawl v1 API.
pub const DEFAULT_FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";
/// Default base URL for the OpenAI-compatible completion API.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Credentials and endpoints for the two external services.
#[derive(Clone)]
pub struct Config {
    /// Bearer key for the crawl service. Empty in cached mode when the
    /// variable is unset, since cached mode never issues a crawl call.
    pub firecrawl_api_key: String,
    /// Base URL for the crawl service API.
    pub firecrawl_api_url: String,
    /// Bearer key for the completion service. Required in every mode.
    pub openai_api_key: String,
    /// Base URL for the completion service API.
    pub openai_api_url: String,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// Fails fast with a [`DigestError::Config`] naming the missing variable
    /// before any network call is attempted. `FIRECRAWL_API_KEY` is only
    /// required in live mode.
    pub fn from_env(mode: RunMode) -> Result<Self> {
        Self::resolve(|name| env::var(name).ok(), mode)
    }

    fn resolve(get: impl Fn(&str) -> Option<String>, mode: RunMode) -> Result<Self> {
        let firecrawl_api_key = match get("FIRECRAWL_API_KEY") {
            Some(key) if !key.is_empty() => key,
            _ if mode == RunMode::Live => return Err(missing("FIRECRAWL_API_KEY")),
            _ => String::new(),
        };

        let openai_api_key = match get("OPENAI_API_KEY") {
            Some(key) if !key.is_empty() => key,
            _ => return Err(missing("OPENAI_API_KEY")),
        };

        Ok(Self {
            firecrawl_api_key,
            firecrawl_api_url: get("FIRECRAWL_API_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_FIRECRAWL_API_URL.to_string()),
            openai_api_key,
            openai_api_url: get("OPENAI_API_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
        })
    }
}

fn missing(name: &str) -> DigestError {
    DigestError::Config(format!(
        "required environment variable {name} is not set"
    ))
}

// Keys stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("firecrawl_api_key", &"<redacted>")
            .field("firecrawl_api_url", &self.firecrawl_api_url)
            .field("openai_api_key", &"<redacted>")
            .field("openai_api_url", &self.openai_api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(pairs: &[(&str, &str)], mode: RunMode) -> Result<Config> {
        let map = vars(pairs);
        Config::resolve(|name| map.get(name).cloned(), mode)
    }

    #[test]
    fn test_live_mode_requires_both_keys() {
        let err = resolve(&[("OPENAI_API_KEY", "sk-test")], RunMode::Live).unwrap_err();
        assert!(err.to_string().contains("FIRECRAWL_API_KEY"));

        let err = resolve(&[("FIRECRAWL_API_KEY", "fc-test")], RunMode::Live).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_cached_mode_does_not_require_crawl_key() {
        let config = resolve(&[("OPENAI_API_KEY", "sk-test")], RunMode::Cached).unwrap();
        assert!(config.firecrawl_api_key.is_empty());
        assert_eq!(config.openai_api_key, "sk-test");
    }

    #[test]
    fn test_default_base_urls() {
        let config = resolve(
            &[("FIRECRAWL_API_KEY", "fc-test"), ("OPENAI_API_KEY", "sk-test")],
            RunMode::Live,
        )
        .unwrap();
        assert_eq!(config.firecrawl_api_url, DEFAULT_FIRECRAWL_API_URL);
        assert_eq!(config.openai_api_url, DEFAULT_OPENAI_API_URL);
    }

    #[test]
    fn test_base_url_overrides() {
        let config = resolve(
            &[
                ("FIRECRAWL_API_KEY", "fc-test"),
                ("OPENAI_API_KEY", "sk-test"),
                ("FIRECRAWL_API_URL", "http://localhost:3002/v1"),
                ("OPENAI_API_URL", "http://localhost:8080/v1"),
            ],
            RunMode::Live,
        )
        .unwrap();
        assert_eq!(config.firecrawl_api_url, "http://localhost:3002/v1");
        assert_eq!(config.openai_api_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let err = resolve(
            &[("FIRECRAWL_API_KEY", ""), ("OPENAI_API_KEY", "sk-test")],
            RunMode::Live,
        )
        .unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = resolve(
            &[("FIRECRAWL_API_KEY", "fc-secret"), ("OPENAI_API_KEY", "sk-secret")],
            RunMode::Live,
        )
        .unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("fc-secret"));
        assert!(!printed.contains("sk-secret"));
    }
}
