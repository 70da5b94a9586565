// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates hoist.yml template files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::AppName;

use super::{AppConfig, CONFIG_FILENAME};

pub fn init_config(dir: &Path, app: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let app = match app {
        Some(name) => AppName::new(name).map_err(|e| Error::InvalidConfig(e.to_string()))?,
        None => default_app_name(dir),
    };

    AppConfig::template(app).write_to_file(&config_path)?;

    Ok(config_path)
}

/// Derive an app name from the directory name, falling back to `my-app`.
fn default_app_name(dir: &Path) -> AppName {
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            n.to_ascii_lowercase()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
                .collect::<String>()
        })
        .and_then(|n| AppName::new(n.trim_matches('-')).ok())
        .unwrap_or_else(|| AppName::new("my-app").expect("literal app name is valid"))
}
