//! Environment variable names and defaults.

use std::time::Duration;

pub const STASHBOX_ENDPOINT: &str = "STASHBOX_ENDPOINT";
pub const STASHBOX_API_KEY: &str = "STASHBOX_API_KEY";
pub const STASHAPP_URL: &str = "STASHAPP_URL";
pub const STASHAPP_API_KEY: &str = "STASHAPP_API_KEY";
pub const CACHE_PATH: &str = "TAGSYNC_CACHE_PATH";
pub const PAGE_SIZE: &str = "TAGSYNC_PAGE_SIZE";
pub const PAGE_DELAY: &str = "TAGSYNC_PAGE_DELAY";
pub const LOG_FILE: &str = "TAGSYNC_LOG_FILE";

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_CACHE_PATH: &str = "tags.json";
pub const DEFAULT_LOG_FILE: &str = "stashdb_tag_importer.log";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(750);

/// stash-box rejects pages larger than this.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Delays below this are likely to trip the remote rate limiter.
pub const MIN_POLITE_PAGE_DELAY: Duration = Duration::from_millis(250);
