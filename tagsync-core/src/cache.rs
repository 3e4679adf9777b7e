//! JSON snapshot of the canonical tag list.

use std::path::PathBuf;

use tagsync_model::CanonicalTag;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{Result, SyncError},
    source::{FetchOptions, TagSource, fetch_all},
};

/// Canonical tags cached on disk as a JSON array.
///
/// The cache never expires on its own; callers decide when to [`refresh`].
///
/// [`refresh`]: TagCache::refresh
#[derive(Debug, Clone)]
pub struct TagCache {
    path: PathBuf,
}

impl TagCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the snapshot, `None` when no snapshot exists yet.
    pub async fn load(&self) -> Result<Option<Vec<CanonicalTag>>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }
        let bytes = tokio::fs::read(&self.path).await?;
        let tags: Vec<CanonicalTag> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), count = tags.len(), "loaded tag cache");
        Ok(Some(tags))
    }

    /// Replace the snapshot (tmp + rename).
    pub async fn store(&self, tags: &[CanonicalTag]) -> Result<()> {
        let bytes = serde_json::to_vec(tags)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SyncError::Internal(format!(
                    "cache path {:?} has no file name",
                    self.path
                ))
            })?;
        let tmp = self
            .path
            .with_file_name(format!("{file_name}.tmp-{}", Uuid::new_v4().simple()));

        if let Err(err) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        tokio::fs::rename(&tmp, &self.path).await?;
        info!(path = %self.path.display(), count = tags.len(), "wrote tag cache");
        Ok(())
    }

    /// Serve the snapshot when present, otherwise fetch and store it.
    pub async fn load_or_fetch(
        &self,
        source: &dyn TagSource,
        options: &FetchOptions,
    ) -> Result<Vec<CanonicalTag>> {
        if let Some(tags) = self.load().await? {
            info!(
                path = %self.path.display(),
                count = tags.len(),
                "using cached canonical tags"
            );
            return Ok(tags);
        }
        self.refresh(source, options).await
    }

    /// Fetch the full list and overwrite the snapshot.
    pub async fn refresh(
        &self,
        source: &dyn TagSource,
        options: &FetchOptions,
    ) -> Result<Vec<CanonicalTag>> {
        let tags = fetch_all(source, options).await?;
        self.store(&tags).await?;
        Ok(tags)
    }
}
