// ABOUTME: Status command implementation.
// ABOUTME: Reports the resolved app, config file, settings, and daemon availability.

use hoist::config::{AppConfig, ClientSettings};
use hoist::error::{Error, Result};
use hoist::runtime::{BollardRuntime, RuntimeErrorKind, RuntimeInfo};
use super::setup::load_explicit;
use std::env;
use std::path::Path;

pub async fn status(config_path: Option<&Path>) -> Result<()> {
    let cwd = env::current_dir()?;
    let settings = ClientSettings::from_env()?;

    let found = match config_path {
        Some(path) => load_explicit(path),
        None => AppConfig::discover(&cwd),
    };
    match found {
        Ok((config, path)) => {
            match &config.app {
                Some(app) => println!("App: {}", app),
                None => println!("App: (not set)"),
            }
            println!("Config: {}", path.display());
            if let Some(build) = &config.build {
                println!("Builder: {}", build.builder);
            }
        }
        Err(Error::ConfigNotFound(_)) if config_path.is_none() => println!("Config: (none)"),
        Err(e) => return Err(e),
    }

    println!("API: {}", settings.api_url);
    println!("Registry: {}", settings.registry_host);
    println!(
        "Access token: {}",
        if settings.access_token.is_some() {
            "set"
        } else {
            "missing"
        }
    );

    let daemon = match BollardRuntime::connect_local() {
        Ok(runtime) => match runtime.ping().await {
            Ok(()) => match runtime.info().await {
                Ok(meta) => format!("{} {} (available)", meta.name, meta.version),
                Err(_) => format!("{} (available)", runtime.runtime_type()),
            },
            Err(e) => format!("{} (unreachable: {})", runtime.runtime_type(), e),
        },
        Err(e) if e.kind() == RuntimeErrorKind::Absent => {
            "none (deploys resolve images in their registry)".to_string()
        }
        Err(e) => format!("unusable ({})", e),
    };
    println!("Daemon: {}", daemon);

    Ok(())
}
