//! Command-line interface definitions for Battery News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the Battery News digest.
///
/// # Examples
///
/// ```sh
/// # Live run: crawl every registered site, then summarize
/// battery_news
///
/// # Replay the last live run's articles without any crawling
/// battery_news --cached
///
/// # Custom registry and prompt template
/// battery_news -s my_sites.csv -t my_prompt.txt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Skip crawling and replay articles from the cache
    #[arg(long)]
    pub cached: bool,

    /// Path to the site registry CSV (columns: url, limit)
    #[arg(short, long, default_value = "sites.csv")]
    pub sites: String,

    /// Path to the article cache file
    #[arg(long, default_value = "articles_cache.json")]
    pub cache_file: String,

    /// Optional prompt template file with `num_articles` and `articles`
    /// placeholders; the built-in template is used when absent
    #[arg(short, long)]
    pub template: Option<String>,

    /// Completion model identifier
    #[arg(long, env = "DIGEST_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_live_mode() {
        let cli = Cli::parse_from(["battery_news", "--model", "gpt-4o-mini"]);

        assert!(!cli.cached);
        assert_eq!(cli.sites, "sites.csv");
        assert_eq!(cli.cache_file, "articles_cache.json");
        assert!(cli.template.is_none());
    }

    #[test]
    fn test_cli_cached_flag() {
        let cli = Cli::parse_from(["battery_news", "--cached", "--model", "gpt-4o-mini"]);

        assert!(cli.cached);
    }

    #[test]
    fn test_cli_paths_and_model() {
        let cli = Cli::parse_from([
            "battery_news",
            "-s",
            "/tmp/sites.csv",
            "--cache-file",
            "/tmp/cache.json",
            "-t",
            "/tmp/prompt.txt",
            "--model",
            "gpt-4o",
        ]);

        assert_eq!(cli.sites, "/tmp/sites.csv");
        assert_eq!(cli.cache_file, "/tmp/cache.json");
        assert_eq!(cli.template.as_deref(), Some("/tmp/prompt.txt"));
        assert_eq!(cli.model, "gpt-4o");
    }
}
