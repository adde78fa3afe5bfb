//! Article cache: the persisted snapshot of the most recent live run.
//!
//! The snapshot is a JSON array of strings, one entry per site in registry
//! order. It is written exactly once per live run, after every site has been
//! crawled, and replaced atomically so a crash mid-write leaves the previous
//! snapshot (or none) untouched. An empty-but-present snapshot is valid and
//! distinct from a missing one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument};

use crate::error::{DigestError, Result};

/// Persisted ordered sequence of per-site article texts.
pub struct ArticleCache {
    path: PathBuf,
}

impl ArticleCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot back as the ordered article sequence.
    ///
    /// A missing file is a [`DigestError::CacheMiss`]; a present but
    /// unreadable or malformed file is a [`DigestError::Cache`].
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<String>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DigestError::CacheMiss {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(self.cache_error(format!("read failed: {e}"))),
        };

        let articles: Vec<String> = serde_json::from_slice(&raw)
            .map_err(|e| self.cache_error(format!("malformed snapshot: {e}")))?;

        info!(count = articles.len(), "Loaded cached articles");
        Ok(articles)
    }

    /// Replace the snapshot with the full ordered sequence, atomically.
    ///
    /// Writes a sibling temp file first and renames it over the target, so
    /// readers never observe a partially written snapshot.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, articles: &[String]) -> Result<()> {
        let json = serde_json::to_vec_pretty(articles)
            .map_err(|e| self.cache_error(format!("serialize failed: {e}")))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)
            .await
            .map_err(|e| self.cache_error(format!("write failed: {e}")))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.cache_error(format!("rename failed: {e}")))?;

        info!(count = articles.len(), "Saved article cache");
        Ok(())
    }

    fn cache_error(&self, reason: String) -> DigestError {
        DigestError::Cache {
            path: self.path.clone(),
            reason,
        }
    }
}
