//! Pipeline orchestrator: the single coordinating entry point.
//!
//! A run either replays the cached articles (`--cached`) or crawls every
//! registered site in order, one at a time. Live runs are all-or-nothing: a
//! single failed site aborts the run before the cache is written, so the
//! previous snapshot is never clobbered by a partial crawl. Once the article
//! sequence is in hand — from either source — the tail is identical: render
//! the prompt, call the completion service once, return the summary.
//!
//! A completion failure after a live crawl leaves the freshly written cache
//! valid, so the run can be repeated with `--cached` without re-crawling.

use tracing::{debug, info, instrument};

use crate::cache::ArticleCache;
use crate::crawl::FetchArticle;
use crate::error::Result;
use crate::llm::Summarize;
use crate::models::SiteDescriptor;
use crate::prompt::PromptBuilder;

/// How the article sequence is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Crawl every registered site, then write the cache snapshot.
    Live,
    /// Replay the previous snapshot; never touches the network for crawling.
    Cached,
}

/// Drives crawl → cache → prompt → summarize.
pub struct Pipeline<C, S> {
    crawler: C,
    summarizer: S,
    cache: ArticleCache,
    prompt_builder: PromptBuilder,
}

impl<C, S> Pipeline<C, S>
where
    C: FetchArticle,
    S: Summarize,
{
    pub fn new(
        crawler: C,
        summarizer: S,
        cache: ArticleCache,
        prompt_builder: PromptBuilder,
    ) -> Self {
        Self {
            crawler,
            summarizer,
            cache,
            prompt_builder,
        }
    }

    /// Produce the digest for the given mode and (in live mode) site list.
    #[instrument(level = "info", skip_all, fields(mode = ?mode, sites = sites.len()))]
    pub async fn run(&self, mode: RunMode, sites: &[SiteDescriptor]) -> Result<String> {
        let articles = match mode {
            RunMode::Cached => {
                info!("Cached mode: replaying articles from the snapshot");
                self.cache.load().await?
            }
            RunMode::Live => self.crawl_all(sites).await?,
        };

        let prompt = self.prompt_builder.build(&articles)?;
        info!(bytes = prompt.len(), "Sending prompt to the completion service");
        let summary = self.summarizer.summarize(&prompt).await?;
        info!(bytes = summary.len(), "Digest ready");
        Ok(summary)
    }

    async fn crawl_all(&self, sites: &[SiteDescriptor]) -> Result<Vec<String>> {
        info!(count = sites.len(), "Live mode: crawling sites");

        let mut articles = Vec::with_capacity(sites.len());
        for site in sites {
            info!(url = %site.url, limit = site.limit, "Crawling site");
            let article = self.crawler.fetch_article(site).await?;
            debug!(url = %site.url, bytes = article.len(), "Aggregated site markdown");
            articles.push(article);
        }

        info!(count = articles.len(), "All sites crawled");
        self.cache.save(&articles).await?;
        Ok(articles)
    }
}
