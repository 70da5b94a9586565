// ABOUTME: Shared helpers for building a deployer from the working directory.
// ABOUTME: Loads config and settings, connects collaborators, pings the daemon.

use hoist::config::{AppConfig, ClientSettings, resolve_config_path};
use hoist::deploy::{CancelSignal, Deployer};
use hoist::error::{Error, Result};
use hoist::output::Output;
use hoist::platform::PlatformClient;
use hoist::registry::RegistryClient;
use hoist::runtime::BollardRuntime;
use hoist::types::AppName;
use std::path::{Path, PathBuf};

pub type CliDeployer = Deployer<BollardRuntime, PlatformClient, RegistryClient>;

/// Load the config named by `--config`, which must exist.
pub fn load_explicit(path: &Path) -> Result<(AppConfig, PathBuf)> {
    let path = resolve_config_path(path);
    if !path.exists() {
        return Err(Error::ConfigNotFound(path));
    }
    let config = AppConfig::load(&path)?;
    Ok((config, path))
}

/// Load the app config: the `--config` path when given, otherwise whatever
/// `dir` holds, or an empty config when it holds nothing.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<AppConfig> {
    let found = match explicit {
        Some(path) => load_explicit(path),
        None => AppConfig::discover(dir),
    };
    match found {
        Ok((config, path)) => {
            tracing::debug!("loaded config from {}", path.display());
            Ok(config)
        }
        Err(Error::ConfigNotFound(_)) if explicit.is_none() => Ok(AppConfig::default()),
        Err(e) => Err(e),
    }
}

pub fn parse_app(app: Option<&str>) -> Result<Option<AppName>> {
    app.map(|name| AppName::new(name).map_err(|e| Error::InvalidConfig(e.to_string())))
        .transpose()
}

/// Build a deployer for the current directory.
pub async fn build_deployer(
    dir: &Path,
    config_path: Option<&Path>,
    app: Option<&str>,
    cancel: CancelSignal,
    output: &Output,
) -> Result<CliDeployer> {
    let config = load_config(dir, config_path)?;
    let app_override = parse_app(app)?;
    if app_override.is_none() && config.app.is_none() {
        return Err(Error::MissingAppName);
    }

    let settings = ClientSettings::from_env()?;
    let token = settings.require_token()?;
    let platform = PlatformClient::new(&settings.api_url, token)
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;
    let registry = RegistryClient::new();

    let daemon = match BollardRuntime::connect_local() {
        Ok(runtime) => Some(runtime),
        Err(e) => {
            tracing::debug!("no local daemon: {}", e);
            None
        }
    };

    let deployer = Deployer::new(
        config,
        app_override,
        settings,
        daemon,
        platform,
        registry,
        cancel,
    )
    .await?
    .with_progress(output.clone());

    Ok(deployer)
}
