use tagsync_model::{CanonicalTag, LocalTag};
use tracing::{debug, info};

use crate::{
    catalog::{TagCreate, TagUpdate},
    context::RunContext,
    error::Result,
    report::Conflict,
};

/// Make sure a local tag named exactly like `tag` exists.
pub async fn ensure_tag_exists(
    ctx: &mut RunContext<'_>,
    tag: &CanonicalTag,
) -> Result<()> {
    let catalog = ctx.catalog;
    match catalog.find_tag(&tag.name).await? {
        None => {
            let input = TagCreate {
                name: tag.name.clone(),
                description: tag.description().map(str::to_string),
            };
            let created = catalog.create_tag(&input).await?;
            ctx.stats.tag_created += 1;
            info!(tag = %created.name, id = %created.id, "created tag");
        }
        Some(local) if local.name == tag.name => {
            debug!(tag = %tag.name, "tag exists");
            if ctx.options.sync_descriptions {
                sync_description(ctx, tag, &local).await?;
            }
        }
        Some(owner) => ctx.conflict(Conflict::CanonicalNameIsAlias {
            name: tag.name.clone(),
            owner: owner.name,
        }),
    }
    Ok(())
}

async fn sync_description(
    ctx: &mut RunContext<'_>,
    tag: &CanonicalTag,
    local: &LocalTag,
) -> Result<()> {
    let current = local.description.as_deref().map(str::trim);
    match tag.description() {
        Some(wanted) if current != Some(wanted) => {
            ctx.catalog
                .update_tag(&TagUpdate::description(local.id.clone(), wanted))
                .await?;
            ctx.stats.tag_updated += 1;
            info!(tag = %local.name, "updated description");
        }
        _ => ctx.stats.tag_not_updated += 1,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::InMemoryCatalog, context::RunOptions};

    #[tokio::test]
    async fn creates_missing_tag_with_description() {
        let catalog = InMemoryCatalog::default();
        let tag = CanonicalTag::new("BDSM")
            .unwrap()
            .with_description("Bondage and discipline");

        let mut ctx = RunContext::new(&catalog, RunOptions::default());
        ensure_tag_exists(&mut ctx, &tag).await.unwrap();
        ensure_tag_exists(&mut ctx, &tag).await.unwrap();

        let local = catalog.tag_named("BDSM").unwrap();
        assert_eq!(local.description.as_deref(), Some("Bondage and discipline"));
        assert_eq!(ctx.stats.tag_created, 1);
        assert_eq!(catalog.writes(), 1);
    }

    #[tokio::test]
    async fn name_held_as_alias_is_a_conflict() {
        let catalog = InMemoryCatalog::default();
        catalog.seed_tag("Feet", &["Foot Fetish"]);
        let tag = CanonicalTag::new("Foot Fetish").unwrap();

        let mut ctx = RunContext::new(&catalog, RunOptions::default());
        ensure_tag_exists(&mut ctx, &tag).await.unwrap();

        assert_eq!(catalog.writes(), 0);
        assert_eq!(
            ctx.report.conflicts,
            vec![Conflict::CanonicalNameIsAlias {
                name: "Foot Fetish".into(),
                owner: "Feet".into(),
            }]
        );
    }

    #[tokio::test]
    async fn descriptions_sync_only_when_enabled() {
        let catalog = InMemoryCatalog::default();
        catalog.seed_tag("Feet", &[]);
        let tag = CanonicalTag::new("Feet").unwrap().with_description("Toes");

        let mut ctx = RunContext::new(&catalog, RunOptions::default());
        ensure_tag_exists(&mut ctx, &tag).await.unwrap();
        assert_eq!(catalog.writes(), 0);

        let options = RunOptions {
            sync_descriptions: true,
            ..RunOptions::default()
        };
        let mut ctx = RunContext::new(&catalog, options);
        ensure_tag_exists(&mut ctx, &tag).await.unwrap();
        ensure_tag_exists(&mut ctx, &tag).await.unwrap();

        assert_eq!(ctx.stats.tag_updated, 1);
        assert_eq!(ctx.stats.tag_not_updated, 1);
        assert_eq!(
            catalog.tag_named("Feet").unwrap().description.as_deref(),
            Some("Toes")
        );
    }
}
