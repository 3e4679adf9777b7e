use async_trait::async_trait;
use tagsync_model::{LocalTag, MediaKind, MediaRef, MediaUpdate, TagId};
use tracing::info;

use super::{CatalogRepository, TagCreate, TagUpdate};
use crate::error::Result;

/// Catalog decorator that serves reads from the wrapped catalog and logs
/// writes without applying them.
///
/// Later lookups do not observe skipped writes, so a dry run reports the
/// work of the first pass over each tag rather than a converged run.
#[derive(Debug, Clone)]
pub struct DryRunCatalog<C> {
    inner: C,
}

impl<C> DryRunCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: CatalogRepository> CatalogRepository for DryRunCatalog<C> {
    async fn find_tag(&self, name: &str) -> Result<Option<LocalTag>> {
        self.inner.find_tag(name).await
    }

    async fn create_tag(&self, input: &TagCreate) -> Result<LocalTag> {
        info!(tag = %input.name, "dry run: would create tag");
        Ok(LocalTag {
            id: TagId::new(format!("dry-run:{}", input.name)),
            name: input.name.clone(),
            aliases: Vec::new(),
            description: input.description.clone(),
        })
    }

    async fn update_tag(&self, input: &TagUpdate) -> Result<()> {
        info!(
            tag = %input.id,
            aliases = ?input.aliases,
            description = input.description.is_some(),
            "dry run: would update tag"
        );
        Ok(())
    }

    async fn merge_tags(&self, source: &TagId, destination: &TagId) -> Result<()> {
        info!(%source, %destination, "dry run: would merge tags");
        Ok(())
    }

    async fn find_media_by_tag(
        &self,
        kind: MediaKind,
        tag: &TagId,
    ) -> Result<Vec<MediaRef>> {
        self.inner.find_media_by_tag(kind, tag).await
    }

    async fn update_media(&self, update: &MediaUpdate) -> Result<()> {
        info!(
            kind = %update.kind(),
            id = update.id(),
            tags = update.tag_ids().len(),
            "dry run: would update media"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    #[tokio::test]
    async fn writes_never_reach_the_wrapped_catalog() {
        let memory = InMemoryCatalog::default();
        let feet = memory.seed_tag("Feet", &[]);
        let dry = DryRunCatalog::new(memory);

        let created = dry
            .create_tag(&TagCreate {
                name: "Kissing".into(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id.as_str(), "dry-run:Kissing");
        dry.update_tag(&TagUpdate::aliases(feet.id.clone(), vec!["Toes".into()]))
            .await
            .unwrap();

        assert_eq!(dry.find_tag("Feet").await.unwrap(), Some(feet));
        let memory = dry.into_inner();
        assert_eq!(memory.writes(), 0);
        assert!(memory.tag_named("Kissing").is_none());
    }
}
