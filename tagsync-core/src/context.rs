//! Explicit per-run state handed to every pipeline component.

use tracing::{error, warn};

use crate::{
    catalog::CatalogRepository,
    error::{Result, SyncError, error_chain},
    report::{Conflict, ItemFailure, Phase, RunReport},
    stats::RunStats,
};

/// What to do when processing of a single canonical tag fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and continue with the next tag.
    #[default]
    Continue,
    /// Stop the run and return the failure.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Merge local tags named after a canonical alias into the canonical tag.
    pub merge_tags: bool,
    /// Overwrite local descriptions that differ from the canonical one.
    pub sync_descriptions: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            merge_tags: true,
            sync_descriptions: false,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

pub struct RunContext<'a> {
    pub catalog: &'a dyn CatalogRepository,
    pub options: RunOptions,
    pub stats: RunStats,
    pub report: RunReport,
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("options", &self.options)
            .field("stats", &self.stats)
            .field("report", &self.report)
            .finish()
    }
}

impl<'a> RunContext<'a> {
    pub fn new(catalog: &'a dyn CatalogRepository, options: RunOptions) -> Self {
        Self {
            catalog,
            options,
            stats: RunStats::default(),
            report: RunReport::default(),
        }
    }

    pub fn conflict(&mut self, conflict: Conflict) {
        warn!(%conflict, "unresolved conflict");
        self.stats.conflicts += 1;
        self.report.conflicts.push(conflict);
    }

    /// Apply the failure policy to the result of processing one item.
    pub fn isolate(
        &mut self,
        item: &str,
        phase: Phase,
        result: Result<()>,
    ) -> Result<()> {
        let Err(err) = result else {
            return Ok(());
        };

        error!(
            tag = item,
            %phase,
            error = %error_chain(&err),
            "processing failed"
        );
        self.stats.failures += 1;

        match self.options.failure_policy {
            FailurePolicy::Continue => {
                self.report.failures.push(ItemFailure {
                    item: item.to_string(),
                    phase,
                    error: err,
                });
                Ok(())
            }
            FailurePolicy::Abort => Err(SyncError::Aborted {
                item: item.to_string(),
                phase,
                source: Box::new(err),
            }),
        }
    }
}
