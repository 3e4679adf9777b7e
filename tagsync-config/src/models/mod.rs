use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub stashbox: StashBoxConfig,
    pub stash: StashAppConfig,
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
    pub log: LogConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn cache_path(&self) -> &Path {
        &self.cache.tags_path
    }

    pub fn log_file(&self) -> &Path {
        &self.log.file
    }
}

/// Remote stash-box (StashDB) connection.
#[derive(Clone)]
pub struct StashBoxConfig {
    pub endpoint: Url,
    pub api_key: String,
}

impl std::fmt::Debug for StashBoxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StashBoxConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Local Stash instance connection.
#[derive(Clone)]
pub struct StashAppConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
}

impl StashAppConfig {
    /// GraphQL endpoint derived from scheme, host and port. Any path on the
    /// configured URL is ignored.
    pub fn graphql_endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}://{}:{}/graphql",
            self.scheme, self.host, self.port
        ))
    }
}

impl std::fmt::Debug for StashAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StashAppConfig")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub tags_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub page_size: u32,
    pub page_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub env_file: Option<PathBuf>,
    pub env_file_loaded: bool,
}
