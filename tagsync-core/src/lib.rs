//! # tagsync core
//!
//! Reconciles tag metadata between a stash-box instance (StashDB) and a local
//! Stash catalog.
//!
//! ## Overview
//!
//! A run is a single sequential pipeline over the canonical tag list:
//!
//! - [`source`]: paged fetch of canonical tags from stash-box, with
//!   [`cache::TagCache`] keeping a JSON snapshot on disk
//! - [`reconcile::create`]: creates canonical tags missing locally
//! - [`reconcile::merge`]: merges local tags named after a canonical alias
//!   into the canonical tag
//! - [`reconcile::aliases`]: the alias state machine, delegating moves to
//!   [`reconcile::migrate`] and [`reconcile::media`]
//! - [`stats`] and [`report`]: counters plus per-item failures and
//!   unresolved conflicts
//!
//! Every mutation is ordered so that an interrupted run can simply be started
//! again: media gain the new tag before an alias is detached from its old tag,
//! and each step is a no-op once its effect is present.
//!
//! ## Example
//!
//! ```no_run
//! use tagsync_core::{
//!     catalog::InMemoryCatalog,
//!     context::RunOptions,
//!     reconcile::run_pipeline,
//! };
//! use tagsync_model::CanonicalTag;
//!
//! async fn sync() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = InMemoryCatalog::default();
//!     let tags = vec![
//!         CanonicalTag::new("Feet")?.with_aliases(["Foot Fetish"]),
//!     ];
//!     let outcome = run_pipeline(&catalog, RunOptions::default(), &tags).await?;
//!     println!("{}", outcome.stats);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod cache;
pub mod catalog;
pub mod context;
pub mod error;
pub mod graphql;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod stats;

pub use error::{Result, SyncError};
