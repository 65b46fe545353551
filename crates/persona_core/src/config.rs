//! Client configuration.
//!
//! # Responsibility
//! - Hold the endpoint and presentation settings shared by front-ends.
//! - Read overrides from the environment, falling back to defaults.
//!
//! # Invariants
//! - `base_url` never ends with `/`.
//! - Invalid environment values are logged and ignored, never fatal.

use crate::service::delete_chain::DeleteChain;
use crate::ui::notify::DEFAULT_TOAST_DURATION;
use log::{info, warn};
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fi.jcaguilar.dev/v1/escuela/persona";
pub const DEFAULT_RAW_PREVIEW_LIMIT: usize = 2000;

pub const ENV_BASE_URL: &str = "PERSONA_API_URL";
pub const ENV_TOAST_MS: &str = "PERSONA_TOAST_MS";
pub const ENV_TIMEOUT_SECS: &str = "PERSONA_TIMEOUT_SECS";
pub const ENV_DELETE_MODE: &str = "PERSONA_DELETE_MODE";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Invalid `ClientConfig` values.
pub enum ConfigError {
    EmptyBaseUrl,
    InvalidBaseUrl { url: String, details: String },
    UnsupportedScheme(String),
    ZeroPreviewLimit,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBaseUrl => write!(f, "base url cannot be empty"),
            Self::InvalidBaseUrl { url, details } => {
                write!(f, "invalid base url `{url}`: {details}")
            }
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "unsupported base url scheme `{scheme}`; expected http|https"
            ),
            Self::ZeroPreviewLimit => write!(f, "raw preview limit must be positive"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for one client instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Collection endpoint `BASE`.
    pub base_url: String,
    pub toast_duration: Duration,
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Bound on server text echoed into messages.
    pub raw_preview_limit: usize,
    pub delete_chain: DeleteChain,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            toast_duration: DEFAULT_TOAST_DURATION,
            request_timeout: None,
            raw_preview_limit: DEFAULT_RAW_PREVIEW_LIMIT,
            delete_chain: DeleteChain::full(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `PERSONA_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_TOAST_MS) {
            config.toast_duration = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS) {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(mode) = lookup(ENV_DELETE_MODE) {
            match DeleteChain::from_mode(&mode) {
                Some(chain) => config.delete_chain = chain,
                None => warn!(
                    "event=config_load module=config status=degraded key={ENV_DELETE_MODE} reason=unsupported_value"
                ),
            }
        }

        info!(
            "event=config_load module=config status=ok timeout_set={} delete_strategies={}",
            config.request_timeout.is_some(),
            config.delete_chain.strategies().len()
        );
        config
    }

    /// Replaces the endpoint, dropping trailing slashes.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Checks that the base url parses and uses `http` or `https`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let url = Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            details: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if self.raw_preview_limit == 0 {
            return Err(ConfigError::ZeroPreviewLimit);
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                "event=config_load module=config status=degraded key={key} reason=parse_failed error={err}"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
    use crate::service::delete_chain::DeleteChain;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.toast_duration, Duration::from_millis(4000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PERSONA_API_URL", "http://localhost:8080/persona/"),
            ("PERSONA_TOAST_MS", "1500"),
            ("PERSONA_TIMEOUT_SECS", "9"),
            ("PERSONA_DELETE_MODE", "path"),
        ]));
        assert_eq!(config.base_url, "http://localhost:8080/persona");
        assert_eq!(config.toast_duration, Duration::from_millis(1500));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(9)));
        assert_eq!(config.delete_chain, DeleteChain::path_only());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PERSONA_TOAST_MS", "soon"),
            ("PERSONA_TIMEOUT_SECS", "0"),
            ("PERSONA_DELETE_MODE", "maybe"),
        ]));
        assert_eq!(config.toast_duration, Duration::from_millis(4000));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.delete_chain, DeleteChain::full());
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let config = ClientConfig::default().with_base_url("ftp://host/persona");
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        let config = ClientConfig::default().with_base_url("/");
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));
    }
}
