//! Shared configuration library for tagsync.
//!
//! Configuration is sourced from the process environment, optionally layered
//! over a `.env` file. Values already present in the environment win over the
//! file, matching `dotenvy` semantics, but the process environment itself is
//! never mutated. Loading produces a validated [`Config`] plus non-fatal
//! [`ConfigWarnings`] the caller logs once tracing is up.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::{
    CacheConfig, Config, ConfigMetadata, FetchConfig, LogConfig,
    StashAppConfig, StashBoxConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
