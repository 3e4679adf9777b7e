pub mod error;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::{
    constants::{
        CACHE_PATH, DEFAULT_CACHE_PATH, DEFAULT_ENV_FILE, DEFAULT_LOG_FILE,
        DEFAULT_PAGE_DELAY, DEFAULT_PAGE_SIZE, LOG_FILE, PAGE_DELAY,
        PAGE_SIZE, STASHAPP_API_KEY, STASHAPP_URL, STASHBOX_API_KEY,
        STASHBOX_ENDPOINT,
    },
    models::{
        CacheConfig, Config, ConfigMetadata, FetchConfig, LogConfig,
        StashAppConfig, StashBoxConfig,
    },
    util::{non_blank, read_env_file},
    validation::{ConfigWarnings, apply_guard_rails},
};

use error::ConfigLoadError;

/// Result of a successful load: the config plus warnings to surface.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Clone)]
enum VarSource {
    Process,
    Fixed(HashMap<String, String>),
}

/// Builds a [`Config`] from environment variables and an optional `.env`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_file: PathBuf,
    env_file_required: bool,
    vars: VarSource,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the process environment and `./.env` if present.
    pub fn new() -> Self {
        Self {
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            env_file_required: false,
            vars: VarSource::Process,
        }
    }

    /// Use an explicit env file. Unlike the default `.env`, an explicit
    /// file must exist.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self.env_file_required = true;
        self
    }

    /// Replace the process environment with a fixed set of variables.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = VarSource::Fixed(
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        );
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_vars, env_file_loaded) = if self.env_file.is_file() {
            (read_env_file(&self.env_file)?, true)
        } else if self.env_file_required {
            return Err(ConfigLoadError::EnvFileMissing {
                path: self.env_file.clone(),
            });
        } else {
            (HashMap::new(), false)
        };

        let lookup = |key: &str| -> Option<String> {
            let primary = match &self.vars {
                VarSource::Process => std::env::var(key).ok(),
                VarSource::Fixed(map) => map.get(key).cloned(),
            };
            non_blank(primary).or_else(|| non_blank(file_vars.get(key).cloned()))
        };

        let stashbox = StashBoxConfig {
            endpoint: parse_url(STASHBOX_ENDPOINT, &require(&lookup, STASHBOX_ENDPOINT)?)?,
            api_key: require(&lookup, STASHBOX_API_KEY)?,
        };

        let stash_url = parse_url(STASHAPP_URL, &require(&lookup, STASHAPP_URL)?)?;
        let host = stash_url
            .host_str()
            .ok_or(ConfigLoadError::MissingHost { key: STASHAPP_URL })?
            .to_string();
        let port = stash_url
            .port_or_known_default()
            .ok_or(ConfigLoadError::MissingHost { key: STASHAPP_URL })?;
        let stash = StashAppConfig {
            scheme: stash_url.scheme().to_string(),
            host,
            port,
            api_key: lookup(STASHAPP_API_KEY),
        };

        let page_size = match lookup(PAGE_SIZE) {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                ConfigLoadError::InvalidNumber {
                    key: PAGE_SIZE,
                    value: raw.clone(),
                }
            })?,
            None => DEFAULT_PAGE_SIZE,
        };
        let page_delay = match lookup(PAGE_DELAY) {
            Some(raw) => parse_delay(&raw)?,
            None => DEFAULT_PAGE_DELAY,
        };

        let config = Config {
            stashbox,
            stash,
            cache: CacheConfig {
                tags_path: lookup(CACHE_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH)),
            },
            fetch: FetchConfig {
                page_size,
                page_delay,
            },
            log: LogConfig {
                file: lookup(LOG_FILE)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            },
            metadata: ConfigMetadata {
                env_file: env_file_loaded.then(|| self.env_file.clone()),
                env_file_loaded,
            },
        };

        let warnings = apply_guard_rails(&config)?;
        Ok(ConfigLoad { config, warnings })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigLoadError> {
    lookup(key).ok_or(ConfigLoadError::MissingVar { key })
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigLoadError> {
    Url::parse(raw).map_err(|source| ConfigLoadError::InvalidUrl { key, source })
}

fn parse_delay(raw: &str) -> Result<Duration, ConfigLoadError> {
    // Bare numbers are read as fractional seconds ("0.75").
    if let Ok(seconds) = raw.parse::<f64>() {
        return Duration::try_from_secs_f64(seconds).map_err(|_| {
            ConfigLoadError::InvalidNumber {
                key: PAGE_DELAY,
                value: raw.to_string(),
            }
        });
    }
    humantime::parse_duration(raw).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            key: PAGE_DELAY,
            source,
        }
    })
}
