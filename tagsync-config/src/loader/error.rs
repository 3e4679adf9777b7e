use super::super::validation::ConfigGuardRailError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("required environment variable {key} is not set")]
    MissingVar { key: &'static str },
    #[error("invalid URL in {key}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{key} must include a host")]
    MissingHost { key: &'static str },
    #[error("invalid number in {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("invalid duration in {key}")]
    InvalidDuration {
        key: &'static str,
        #[source]
        source: humantime::DurationError,
    },
    #[error("env file {path} does not exist")]
    EnvFileMissing { path: PathBuf },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
