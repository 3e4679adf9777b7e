use tagsync_model::{LocalTag, MediaKind};
use tracing::{debug, info};

use super::media::migrate_media;
use crate::{
    catalog::{TagUpdate, find_tag_by_primary_name},
    context::RunContext,
    error::{Result, SyncError},
};

/// Move `alias` from `old` to `new`.
///
/// Both tags are looked up again by name first. Every scene, gallery,
/// performer and marker tagged with `old` gains `new` before the alias is
/// detached from `old`; only then is it attached to `new`. `old` itself is
/// left in place. Each step is a no-op when its effect is already present,
/// so an interrupted migration completes on the next run.
///
/// Returns `new` as it stands after the alias was attached.
pub async fn migrate_alias(
    ctx: &mut RunContext<'_>,
    old: &LocalTag,
    new: &LocalTag,
    alias: &str,
) -> Result<LocalTag> {
    let catalog = ctx.catalog;
    let old = find_tag_by_primary_name(catalog, &old.name)
        .await?
        .ok_or_else(|| SyncError::TagNotFound(old.name.clone()))?;
    let mut new = find_tag_by_primary_name(catalog, &new.name)
        .await?
        .ok_or_else(|| SyncError::TagNotFound(new.name.clone()))?;

    info!(alias, from = %old.name, to = %new.name, "migrating alias");

    for kind in MediaKind::ALL {
        let items = catalog.find_media_by_tag(kind, &old.id).await?;
        if items.is_empty() {
            continue;
        }
        let updated = migrate_media(ctx, &items, &new).await?;
        debug!(
            kind = kind.plural(),
            found = items.len(),
            updated,
            tag = %old.name,
            "migrated media"
        );
    }

    if old.has_alias(alias) {
        let remaining: Vec<String> = old
            .aliases
            .iter()
            .filter(|existing| existing.as_str() != alias)
            .cloned()
            .collect();
        catalog
            .update_tag(&TagUpdate::aliases(old.id.clone(), remaining))
            .await?;
    }

    if !new.has_alias(alias) {
        new.aliases.push(alias.to_string());
        catalog
            .update_tag(&TagUpdate::aliases(new.id.clone(), new.aliases.clone()))
            .await?;
    }

    ctx.stats.alias_migrated += 1;
    Ok(new)
}
