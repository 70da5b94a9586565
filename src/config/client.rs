// ABOUTME: Client settings for talking to the platform and its registry.
// ABOUTME: Read from HOIST_* environment variables with sensible defaults.

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.hoist.dev";
pub const DEFAULT_REGISTRY_HOST: &str = "registry.hoist.dev";

pub const ENV_API_URL: &str = "HOIST_API_URL";
pub const ENV_ACCESS_TOKEN: &str = "HOIST_ACCESS_TOKEN";
pub const ENV_REGISTRY_HOST: &str = "HOIST_REGISTRY_HOST";
pub const ENV_POLL_INTERVAL: &str = "HOIST_POLL_INTERVAL";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_url: String,
    pub access_token: Option<String>,
    pub registry_host: String,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            registry_host: DEFAULT_REGISTRY_HOST.to_string(),
            poll_interval: default_poll_interval(),
        }
    }
}

pub fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

impl ClientSettings {
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Some(url) = non_empty_var(ENV_API_URL) {
            settings.api_url = url.trim_end_matches('/').to_string();
        }

        settings.access_token = non_empty_var(ENV_ACCESS_TOKEN);

        if let Some(host) = non_empty_var(ENV_REGISTRY_HOST) {
            settings.registry_host = host;
        }

        if let Some(raw) = non_empty_var(ENV_POLL_INTERVAL) {
            settings.poll_interval = humantime::parse_duration(&raw).map_err(|e| {
                Error::InvalidConfig(format!("{}={}: {}", ENV_POLL_INTERVAL, raw, e))
            })?;
        }

        Ok(settings)
    }

    /// The access token, or an error naming the variable to set.
    pub fn require_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| Error::MissingEnvVar(ENV_ACCESS_TOKEN.to_string()))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
