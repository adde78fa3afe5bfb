//! Site registry loader.
//!
//! The registry is a CSV file with a header row containing at least the
//! `url` and `limit` columns. Row order is significant: articles flow
//! through the pipeline in registry order.

use std::path::Path;

use tracing::{info, instrument};
use url::Url;

use crate::error::{DigestError, Result};
use crate::models::SiteDescriptor;

/// Load the ordered list of sites to crawl from a CSV registry.
///
/// Every failure is a [`DigestError::Config`] naming the file and, where it
/// applies, the row and offending value. No network or cache access happens
/// here.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_sites(path: &Path) -> Result<Vec<SiteDescriptor>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| config_error(path, format!("{e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| config_error(path, format!("unreadable header row: {e}")))?
        .clone();
    let url_col = column(&headers, "url").ok_or_else(|| {
        config_error(path, "missing required column `url`".to_string())
    })?;
    let limit_col = column(&headers, "limit").ok_or_else(|| {
        config_error(path, "missing required column `limit`".to_string())
    })?;

    let mut sites = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // Header occupies line 1.
        let line = index + 2;
        let record =
            record.map_err(|e| config_error(path, format!("line {line}: {e}")))?;

        let url = record.get(url_col).unwrap_or_default();
        if url.is_empty() {
            return Err(config_error(path, format!("line {line}: empty url")));
        }
        Url::parse(url).map_err(|e| {
            config_error(path, format!("line {line}: invalid url `{url}`: {e}"))
        })?;

        let raw_limit = record.get(limit_col).unwrap_or_default().trim();
        let limit: u32 = raw_limit.parse().map_err(|_| {
            config_error(
                path,
                format!("line {line}: limit `{raw_limit}` is not a positive integer"),
            )
        })?;
        if limit == 0 {
            return Err(config_error(
                path,
                format!("line {line}: limit must be at least 1"),
            ));
        }

        sites.push(SiteDescriptor {
            url: url.to_string(),
            limit,
        });
    }

    info!(count = sites.len(), "Loaded site registry");
    Ok(sites)
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn config_error(path: &Path, detail: String) -> DigestError {
    DigestError::Config(format!("site registry {}: {detail}", path.display()))
}
