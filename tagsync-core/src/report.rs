//! Per-run outcome records: isolated failures and unresolved conflicts.

use std::fmt;

use crate::error::{SyncError, error_chain};

/// Pipeline pass an item was being processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Merge,
    Aliases,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Create => "tag creation",
            Phase::Merge => "tag merge",
            Phase::Aliases => "alias reconciliation",
        })
    }
}

/// A canonical tag whose processing was abandoned.
#[derive(Debug)]
pub struct ItemFailure {
    pub item: String,
    pub phase: Phase,
    pub error: SyncError,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" failed during {}: {}",
            self.item,
            self.phase,
            error_chain(&self.error)
        )
    }
}

/// Data shapes the pipeline refuses to resolve on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The canonical tag's name is only known locally as an alias of `owner`.
    CanonicalNameIsAlias { name: String, owner: String },
    /// A canonical alias is the primary name of a separate local tag that was
    /// not merged.
    AliasIsTagName {
        canonical: String,
        alias: String,
        tag: String,
    },
    /// A canonical alias is also the name of another canonical tag, so the
    /// local tag carrying that name must not be merged away.
    AliasIsCanonicalTag { canonical: String, alias: String },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::CanonicalNameIsAlias { name, owner } => write!(
                f,
                "canonical tag \"{name}\" exists locally only as an alias of \"{owner}\""
            ),
            Conflict::AliasIsTagName {
                canonical,
                alias,
                tag,
            } => write!(
                f,
                "alias \"{alias}\" of \"{canonical}\" is the name of local tag \"{tag}\""
            ),
            Conflict::AliasIsCanonicalTag { canonical, alias } => write!(
                f,
                "alias \"{alias}\" of \"{canonical}\" is itself a canonical tag"
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub failures: Vec<ItemFailure>,
    pub conflicts: Vec<Conflict>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.conflicts.is_empty()
    }

    pub fn failures_in(&self, phase: Phase) -> impl Iterator<Item = &ItemFailure> {
        self.failures.iter().filter(move |f| f.phase == phase)
    }
}
