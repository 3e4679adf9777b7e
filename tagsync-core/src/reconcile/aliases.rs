use tagsync_model::{CanonicalTag, LocalTag};
use tracing::{debug, info};

use super::migrate::migrate_alias;
use crate::{
    catalog::{TagUpdate, find_tag_by_primary_name},
    context::RunContext,
    error::Result,
    report::Conflict,
};

/// Where an alias string currently lives in the local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasState {
    NotFound,
    /// Listed among the aliases of the contained tag.
    FoundAsAlias(LocalTag),
    /// Primary name of the contained tag.
    FoundAsName(LocalTag),
}

/// Classify the result of looking `alias` up in the catalog.
pub fn classify(alias: &str, found: Option<LocalTag>) -> AliasState {
    match found {
        None => AliasState::NotFound,
        Some(tag) if tag.name == alias => AliasState::FoundAsName(tag),
        Some(tag) => AliasState::FoundAsAlias(tag),
    }
}

/// Bring the aliases of `tag`'s local counterpart in line with `tag`.
///
/// Canonical tags without a local tag of the same name are skipped.
pub async fn arrange_aliases(
    ctx: &mut RunContext<'_>,
    tag: &CanonicalTag,
) -> Result<()> {
    let catalog = ctx.catalog;
    let Some(mut local) = find_tag_by_primary_name(catalog, &tag.name).await? else {
        debug!(tag = %tag.name, "no local tag, skipping aliases");
        return Ok(());
    };

    for alias in &tag.aliases {
        if alias.trim().is_empty() || *alias == local.name {
            continue;
        }

        match classify(alias, catalog.find_tag(alias).await?) {
            AliasState::NotFound => {
                let mut aliases = local.aliases.clone();
                aliases.push(alias.clone());
                catalog
                    .update_tag(&TagUpdate::aliases(local.id.clone(), aliases.clone()))
                    .await?;
                local.aliases = aliases;
                ctx.stats.alias_created += 1;
                info!(tag = %local.name, alias = %alias, "added alias");
            }
            AliasState::FoundAsAlias(owner) if owner.id == local.id => {}
            AliasState::FoundAsAlias(owner) => {
                local = migrate_alias(ctx, &owner, &local, alias).await?;
            }
            AliasState::FoundAsName(other) => {
                let refused = Conflict::AliasIsCanonicalTag {
                    canonical: tag.name.clone(),
                    alias: alias.clone(),
                };
                if ctx.report.conflicts.contains(&refused) {
                    debug!(tag = %tag.name, alias = %alias, "merge already refused");
                } else {
                    ctx.conflict(Conflict::AliasIsTagName {
                        canonical: tag.name.clone(),
                        alias: alias.clone(),
                        tag: other.name,
                    });
                }
            }
        }
    }

    Ok(())
}
