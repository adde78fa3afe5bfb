//! Core data types for the digest pipeline.
//!
//! - [`SiteDescriptor`]: one configured news source (URL plus crawl limit)
//! - [`CrawledPage`]: one page's markdown as returned by the crawl service
//!
//! The pipeline only ever sees crawl results as an ordered sequence of
//! [`CrawledPage`] records, keeping it independent of the crawl service's
//! actual response shape.

/// A configured news source: where to crawl and how many pages to take.
///
/// Descriptors are created by the registry loader at startup and read-only
/// afterwards. Their order in the registry file is the order articles flow
/// through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDescriptor {
    /// The site URL handed to the crawl service.
    pub url: String,
    /// Maximum number of pages to crawl for this site. Always positive.
    pub limit: u32,
}

/// One crawled page's markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    /// The page content in markdown form.
    pub content: String,
}
