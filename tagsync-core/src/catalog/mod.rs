//! Local catalog port and its implementations.

mod dry_run;
mod memory;
mod stash;

pub use dry_run::DryRunCatalog;
pub use memory::{CatalogSnapshot, InMemoryCatalog};
pub use stash::StashClient;

use async_trait::async_trait;
use tagsync_model::{LocalTag, MediaKind, MediaRef, MediaUpdate, TagId};

use crate::error::Result;

/// Input for creating a local tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Partial tag update; only fields that are `Some` are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUpdate {
    pub id: TagId,
    pub aliases: Option<Vec<String>>,
    pub description: Option<String>,
}

impl TagUpdate {
    pub fn aliases(id: TagId, aliases: Vec<String>) -> Self {
        Self {
            id,
            aliases: Some(aliases),
            description: None,
        }
    }

    pub fn description(id: TagId, description: impl Into<String>) -> Self {
        Self {
            id,
            aliases: None,
            description: Some(description.into()),
        }
    }
}

/// Repository port for the local media catalog.
///
/// Lookups are exact and case-sensitive. `find_tag` resolves a string the way
/// Stash resolves tag references: a tag whose primary name matches wins,
/// otherwise the tag listing the string among its aliases is returned.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_tag(&self, name: &str) -> Result<Option<LocalTag>>;

    async fn create_tag(&self, input: &TagCreate) -> Result<LocalTag>;

    async fn update_tag(&self, input: &TagUpdate) -> Result<()>;

    /// Fold `source` into `destination`: references move to the destination,
    /// the source name and aliases become destination aliases, and the
    /// source tag is deleted.
    async fn merge_tags(&self, source: &TagId, destination: &TagId) -> Result<()>;

    /// All entities of `kind` that carry `tag`.
    async fn find_media_by_tag(
        &self,
        kind: MediaKind,
        tag: &TagId,
    ) -> Result<Vec<MediaRef>>;

    /// Replace the full tag set of one entity.
    async fn update_media(&self, update: &MediaUpdate) -> Result<()>;
}

/// Resolve `name` to the tag whose primary name is exactly `name`.
pub async fn find_tag_by_primary_name(
    catalog: &dyn CatalogRepository,
    name: &str,
) -> Result<Option<LocalTag>> {
    Ok(catalog.find_tag(name).await?.filter(|tag| tag.name == name))
}
