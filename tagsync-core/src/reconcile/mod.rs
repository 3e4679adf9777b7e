//! The reconciliation pipeline: create, merge, then arrange aliases.

pub mod aliases;
pub mod create;
pub mod media;
pub mod merge;
pub mod migrate;

use std::collections::HashSet;

use tagsync_model::CanonicalTag;
use tracing::{Instrument, info, info_span};

use crate::{
    catalog::CatalogRepository,
    context::{RunContext, RunOptions},
    error::Result,
    report::{Phase, RunReport},
    stats::RunStats,
};

#[derive(Debug)]
pub struct RunOutcome {
    pub stats: RunStats,
    pub report: RunReport,
}

/// One reconciliation run against a catalog.
pub struct Pipeline<'a> {
    catalog: &'a dyn CatalogRepository,
    options: RunOptions,
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    pub fn new(catalog: &'a dyn CatalogRepository, options: RunOptions) -> Self {
        Self { catalog, options }
    }

    /// Process every canonical tag through each pass in turn.
    ///
    /// Per-tag failures are handled by the run's failure policy; with
    /// [`FailurePolicy::Abort`] the first one is returned as the error.
    ///
    /// [`FailurePolicy::Abort`]: crate::context::FailurePolicy::Abort
    pub async fn run(&self, tags: &[CanonicalTag]) -> Result<RunOutcome> {
        let mut ctx = RunContext::new(self.catalog, self.options);
        info!(count = tags.len(), "processing canonical tags");

        for tag in tags {
            let result = create::ensure_tag_exists(&mut ctx, tag)
                .instrument(info_span!("create", tag = %tag.name))
                .await;
            ctx.isolate(&tag.name, Phase::Create, result)?;
        }

        if self.options.merge_tags {
            let canonical_names: HashSet<&str> =
                tags.iter().map(|tag| tag.name.as_str()).collect();
            for tag in tags {
                let result = merge::merge_alias_tags(&mut ctx, tag, &canonical_names)
                    .instrument(info_span!("merge", tag = %tag.name))
                    .await;
                ctx.isolate(&tag.name, Phase::Merge, result)?;
            }
        }

        for tag in tags {
            let result = aliases::arrange_aliases(&mut ctx, tag)
                .instrument(info_span!("aliases", tag = %tag.name))
                .await;
            ctx.isolate(&tag.name, Phase::Aliases, result)?;
        }

        for line in ctx.stats.summary_lines() {
            info!("{line}");
        }

        Ok(RunOutcome {
            stats: ctx.stats,
            report: ctx.report,
        })
    }
}

/// Run the pipeline once over `tags`.
pub async fn run_pipeline(
    catalog: &dyn CatalogRepository,
    options: RunOptions,
    tags: &[CanonicalTag],
) -> Result<RunOutcome> {
    Pipeline::new(catalog, options).run(tags).await
}
