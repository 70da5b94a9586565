// ABOUTME: Per-invocation deployment context.
// ABOUTME: App name, config, daemon availability, and the caller's cancel signal.

use super::cancel::CancelSignal;
use super::error::DeployError;
use crate::config::{AppConfig, Definition};
use crate::types::AppName;

/// State shared by every stage of one deploy.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    app_name: AppName,
    app_config: AppConfig,
    daemon_available: bool,
    cancel: CancelSignal,
}

impl DeploymentContext {
    /// Build a context. An explicit app name wins over the config's `app`.
    pub fn new(
        app_config: AppConfig,
        app_override: Option<AppName>,
        daemon_available: bool,
        cancel: CancelSignal,
    ) -> Result<Self, DeployError> {
        let app_name = app_override
            .or_else(|| app_config.app.clone())
            .ok_or_else(|| {
                DeployError::Config(
                    "no app name: pass --app or set `app` in the config file".to_string(),
                )
            })?;

        Ok(Self {
            app_name,
            app_config,
            daemon_available,
            cancel,
        })
    }

    pub fn app_name(&self) -> &AppName {
        &self.app_name
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn definition(&self) -> &Definition {
        &self.app_config.definition
    }

    pub fn daemon_available(&self) -> bool {
        self.daemon_available
    }

    pub fn cancel(&self) -> &CancelSignal {
        &self.cancel
    }

    /// Replace the definition with the platform's canonical copy.
    pub(crate) fn replace_definition(&mut self, definition: Definition) {
        self.app_config.definition = definition;
    }
}
