use std::collections::HashSet;

use tagsync_model::CanonicalTag;
use tracing::{debug, info};

use crate::{
    catalog::find_tag_by_primary_name,
    context::RunContext,
    error::Result,
    report::Conflict,
};

/// Fold local tags named after one of `tag`'s aliases into `tag`.
///
/// `canonical_names` holds every canonical tag name of the run; a local tag
/// carrying one of those names is never merged away.
pub async fn merge_alias_tags(
    ctx: &mut RunContext<'_>,
    tag: &CanonicalTag,
    canonical_names: &HashSet<&str>,
) -> Result<()> {
    let catalog = ctx.catalog;
    let Some(target) = find_tag_by_primary_name(catalog, &tag.name).await? else {
        debug!(tag = %tag.name, "no local tag, skipping merge");
        return Ok(());
    };

    for alias in &tag.aliases {
        if alias == &tag.name {
            continue;
        }
        let Some(found) = catalog.find_tag(alias).await? else {
            continue;
        };
        if found.name != *alias || found.id == target.id {
            continue;
        }
        if canonical_names.contains(alias.as_str()) {
            ctx.conflict(Conflict::AliasIsCanonicalTag {
                canonical: tag.name.clone(),
                alias: alias.clone(),
            });
            continue;
        }

        catalog.merge_tags(&found.id, &target.id).await?;
        ctx.stats.tag_merged += 1;
        info!(source = %found.name, destination = %target.name, "merged tag");
    }

    Ok(())
}
