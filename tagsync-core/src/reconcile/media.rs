use tagsync_model::{LocalTag, MediaRef};
use tracing::debug;

use crate::{context::RunContext, error::Result};

/// Add `new_tag` to every item that does not carry it yet.
///
/// Tags are only ever added. Returns the number of items updated.
pub async fn migrate_media(
    ctx: &mut RunContext<'_>,
    items: &[MediaRef],
    new_tag: &LocalTag,
) -> Result<usize> {
    let catalog = ctx.catalog;
    let mut updated = 0;

    for item in items {
        if item.has_tag(&new_tag.id) {
            continue;
        }
        let mut tag_ids = item.tag_ids();
        tag_ids.push(new_tag.id.clone());
        catalog.update_media(&item.update_with(tag_ids)).await?;

        ctx.stats.media_updated += 1;
        updated += 1;
        debug!(
            kind = %item.kind(),
            media = %item.label(),
            tag = %new_tag.name,
            "added tag to media"
        );
    }

    Ok(updated)
}
