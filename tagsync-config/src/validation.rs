use thiserror::Error;

use crate::constants::{MAX_PAGE_SIZE, MIN_POLITE_PAGE_DELAY};

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("page size must be between 1 and {max}, got {value}")]
    PageSizeOutOfRange { value: u32, max: u32 },
    #[error("{field} must use http or https, got '{scheme}'")]
    UnsupportedScheme { field: &'static str, scheme: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let fetch = &config.fetch;
    if fetch.page_size == 0 || fetch.page_size > MAX_PAGE_SIZE {
        return Err(ConfigGuardRailError::PageSizeOutOfRange {
            value: fetch.page_size,
            max: MAX_PAGE_SIZE,
        });
    }

    ensure_http("STASHBOX_ENDPOINT", config.stashbox.endpoint.scheme())?;
    ensure_http("STASHAPP_URL", &config.stash.scheme)?;

    if config.stashbox.endpoint.scheme() == "http" {
        warnings.push_with_hint(
            "STASHBOX_ENDPOINT uses plain http; the API key is sent unencrypted",
            "Use the https endpoint of the stash-box instance",
        );
    }

    if config.stash.api_key.is_none() {
        warnings.push_with_hint(
            "STASHAPP_API_KEY not set; requests to Stash are unauthenticated",
            "Set STASHAPP_API_KEY if the Stash instance has authentication enabled",
        );
    }

    if fetch.page_delay < MIN_POLITE_PAGE_DELAY {
        warnings.push_with_hint(
            format!(
                "TAGSYNC_PAGE_DELAY of {:?} is below {:?}",
                fetch.page_delay, MIN_POLITE_PAGE_DELAY
            ),
            "Short delays between pages may get the client rate limited",
        );
    }

    Ok(warnings)
}

fn ensure_http(
    field: &'static str,
    scheme: &str,
) -> Result<(), ConfigGuardRailError> {
    match scheme {
        "http" | "https" => Ok(()),
        other => Err(ConfigGuardRailError::UnsupportedScheme {
            field,
            scheme: other.to_string(),
        }),
    }
}
